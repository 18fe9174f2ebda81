// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The boundary to the remote conference store.

use crate::error::PortError;
use async_trait::async_trait;
use conftrack_domain::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level fields of one record, without its id or nested collections.
pub type Payload = Map<String, Value>;

/// A record to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    /// The owning record for nested kinds; `None` for top-level kinds.
    pub parent_id: Option<EntityId>,
    pub payload: Payload,
}

/// A record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: EntityId,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    pub payload: Payload,
}

/// Asynchronous, independently failable access to the conference store.
///
/// Implementations own timeouts and transport concerns. Every call is
/// attempted once; callers never retry.
#[async_trait]
pub trait PersistencePort: Send + Sync {
    /// Creates a batch of records of one kind.
    ///
    /// The batch is all-or-nothing. On success the stored records are
    /// returned in the order they were sent.
    async fn create(
        &self,
        kind: EntityKind,
        records: Vec<NewRecord>,
    ) -> Result<Vec<StoredRecord>, PortError>;

    /// Overwrites the given top-level fields of one record.
    async fn update(
        &self,
        kind: EntityKind,
        id: &EntityId,
        patch: Payload,
    ) -> Result<(), PortError>;

    /// Deletes one record.
    async fn delete(&self, kind: EntityKind, id: &EntityId) -> Result<(), PortError>;

    /// Lists every record of a kind in creation order.
    async fn list(&self, kind: EntityKind) -> Result<Vec<StoredRecord>, PortError>;
}
