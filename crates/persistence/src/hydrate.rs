// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rebuilding typed entities from canonical store records.

use crate::error::ReconcileError;
use crate::node::child_field;
use crate::port::{PersistencePort, StoredRecord};
use conftrack::ConferenceDraft;
use conftrack_domain::{EntityId, EntityKind, Tracked};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Every record of a conference, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    by_kind: BTreeMap<EntityKind, Vec<StoredRecord>>,
}

impl RecordSet {
    /// Lists every kind from the port concurrently.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::Refetch` for the first kind that failed.
    pub async fn fetch<P: PersistencePort + ?Sized>(port: &P) -> Result<Self, ReconcileError> {
        let listed = join_all(EntityKind::ALL.map(|kind| async move {
            (kind, port.list(kind).await)
        }))
        .await;

        let mut set: Self = Self::default();
        for (kind, result) in listed {
            let records: Vec<StoredRecord> =
                result.map_err(|source| ReconcileError::Refetch { kind, source })?;
            debug!(%kind, count = records.len(), "Fetched canonical records");
            set.by_kind.insert(kind, records);
        }
        Ok(set)
    }

    /// Creates a set from already listed records.
    #[must_use]
    pub const fn from_records(by_kind: BTreeMap<EntityKind, Vec<StoredRecord>>) -> Self {
        Self { by_kind }
    }

    /// Returns the records of one kind.
    #[must_use]
    pub fn records(&self, kind: EntityKind) -> &[StoredRecord] {
        self.by_kind.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Rebuilds every top-level entity of `T`'s kind with its nested entities.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::Payload` if a record does not deserialize.
    pub fn hydrate<T: Tracked + DeserializeOwned>(&self) -> Result<Vec<T>, ReconcileError> {
        self.records(T::KIND)
            .iter()
            .map(|record| {
                serde_json::from_value(self.to_value(T::KIND, record)).map_err(|err| {
                    ReconcileError::Payload {
                        kind: T::KIND,
                        message: format!("record '{}': {err}", record.id),
                    }
                })
            })
            .collect()
    }

    /// Rebuilds the whole conference draft.
    ///
    /// # Errors
    ///
    /// Returns the first hydration error.
    pub fn to_draft(&self) -> Result<ConferenceDraft, ReconcileError> {
        Ok(ConferenceDraft {
            research_phases: self.hydrate()?,
            tickets: self.hydrate()?,
            sessions: self.hydrate()?,
            policies: self.hydrate()?,
            materials: self.hydrate()?,
            ranking_files: self.hydrate()?,
            ranking_references: self.hydrate()?,
            media: self.hydrate()?,
            sponsors: self.hydrate()?,
        })
    }

    fn to_value(&self, kind: EntityKind, record: &StoredRecord) -> Value {
        let mut object = record.payload.clone();
        object.insert(
            String::from("id"),
            Value::String(record.id.as_str().to_string()),
        );
        if let Some((field, child_kind)) = child_field(kind) {
            let children: Vec<Value> = self
                .children_of(child_kind, &record.id)
                .map(|child| self.to_value(child_kind, child))
                .collect();
            object.insert(field.to_string(), Value::Array(children));
        }
        Value::Object(object)
    }

    fn children_of<'a>(
        &'a self,
        kind: EntityKind,
        parent_id: &'a EntityId,
    ) -> impl Iterator<Item = &'a StoredRecord> + 'a {
        self.records(kind)
            .iter()
            .filter(move |record| record.parent_id.as_ref() == Some(parent_id))
    }
}
