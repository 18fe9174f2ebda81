// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-process conference store.
//!
//! The store enforces the same referential rules as the remote one: nested
//! records need an existing parent and a parent cannot be deleted while it
//! still has nested records. Every call is journaled, and failures can be
//! injected per operation, kind and id.

use crate::error::PortError;
use crate::node::child_field;
use crate::port::{NewRecord, Payload, PersistencePort, StoredRecord};
use async_trait::async_trait;
use conftrack_domain::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A port call kind, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Create,
    Update,
    Delete,
    List,
}

impl StoreOperation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
        }
    }
}

/// A mutating call received by the store, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    Create { kind: EntityKind, count: usize },
    Update { kind: EntityKind, id: EntityId },
    Delete { kind: EntityKind, id: EntityId },
}

#[derive(Debug, Clone)]
struct InjectedFailure {
    operation: StoreOperation,
    kind: EntityKind,
    id: Option<EntityId>,
}

impl InjectedFailure {
    fn matches(&self, operation: StoreOperation, kind: EntityKind, id: Option<&EntityId>) -> bool {
        self.operation == operation
            && self.kind == kind
            && self.id.as_ref().is_none_or(|target| Some(target) == id)
    }
}

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    records: BTreeMap<EntityKind, Vec<StoredRecord>>,
}

impl StoreData {
    fn records(&self, kind: EntityKind) -> &[StoredRecord] {
        self.records.get(&kind).map_or(&[], Vec::as_slice)
    }

    fn contains(&self, kind: EntityKind, id: &EntityId) -> bool {
        self.records(kind).iter().any(|record| &record.id == id)
    }

    fn child_count(&self, kind: EntityKind, id: &EntityId) -> usize {
        child_field(kind).map_or(0, |(_, child_kind)| {
            self.records(child_kind)
                .iter()
                .filter(|record| record.parent_id.as_ref() == Some(id))
                .count()
        })
    }

    fn assign_id(&mut self, kind: EntityKind) -> EntityId {
        self.next_id += 1;
        EntityId::new(format!("{}-{}", kind.as_str(), self.next_id))
    }
}

#[derive(Debug, Default)]
struct Inner {
    data: StoreData,
    journal: Vec<JournalEntry>,
    failures: Vec<InjectedFailure>,
}

impl Inner {
    fn check_injected(
        &self,
        operation: StoreOperation,
        kind: EntityKind,
        id: Option<&EntityId>,
    ) -> Result<(), PortError> {
        if self
            .failures
            .iter()
            .any(|failure| failure.matches(operation, kind, id))
        {
            return Err(PortError::Rejected {
                operation: operation.as_str().to_string(),
                kind,
                message: String::from("injected failure"),
            });
        }
        Ok(())
    }
}

/// A [`PersistencePort`] over records held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a JSON document.
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns `PortError::Io` if the file cannot be read, or
    /// `PortError::Serialization` if it is not a store document.
    pub async fn load(path: &Path) -> Result<Self, PortError> {
        if !tokio::fs::try_exists(path).await? {
            info!(path = %path.display(), "Store file not found, starting empty");
            return Ok(Self::new());
        }

        let contents: String = tokio::fs::read_to_string(path).await?;
        let data: StoreData = serde_json::from_str(&contents)?;
        info!(
            path = %path.display(),
            kinds = data.records.len(),
            "Loaded store"
        );
        Ok(Self {
            inner: Mutex::new(Inner {
                data,
                ..Inner::default()
            }),
        })
    }

    /// Writes the records to a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `PortError::Io` if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<(), PortError> {
        let contents: String = {
            let inner = self.inner.lock().await;
            serde_json::to_string_pretty(&inner.data)?
        };
        tokio::fs::write(path, contents).await?;
        info!(path = %path.display(), "Saved store");
        Ok(())
    }

    /// Makes every matching call fail until cleared.
    ///
    /// With `id` set, only calls on that record fail.
    pub async fn fail_on(&self, operation: StoreOperation, kind: EntityKind, id: Option<EntityId>) {
        self.inner.lock().await.failures.push(InjectedFailure {
            operation,
            kind,
            id,
        });
    }

    /// Removes every injected failure.
    pub async fn clear_failures(&self) {
        self.inner.lock().await.failures.clear();
    }

    /// Returns the mutating calls received so far.
    pub async fn journal(&self) -> Vec<JournalEntry> {
        self.inner.lock().await.journal.clone()
    }

    pub async fn clear_journal(&self) {
        self.inner.lock().await.journal.clear();
    }
}

#[async_trait]
impl PersistencePort for InMemoryStore {
    async fn create(
        &self,
        kind: EntityKind,
        records: Vec<NewRecord>,
    ) -> Result<Vec<StoredRecord>, PortError> {
        let mut inner = self.inner.lock().await;
        inner.journal.push(JournalEntry::Create {
            kind,
            count: records.len(),
        });
        inner.check_injected(StoreOperation::Create, kind, None)?;

        // The whole batch is checked before anything is stored
        if let Some(parent_kind) = kind.parent() {
            if let Some(orphan) = records.iter().find(|record| {
                record
                    .parent_id
                    .as_ref()
                    .is_none_or(|parent_id| !inner.data.contains(parent_kind, parent_id))
            }) {
                return Err(PortError::MissingParent {
                    kind,
                    parent_id: orphan.parent_id.clone(),
                });
            }
        }

        let mut stored: Vec<StoredRecord> = Vec::with_capacity(records.len());
        for record in records {
            let id: EntityId = inner.data.assign_id(kind);
            stored.push(StoredRecord {
                id,
                parent_id: kind.parent().and(record.parent_id),
                payload: record.payload,
            });
        }
        inner
            .data
            .records
            .entry(kind)
            .or_default()
            .extend(stored.iter().cloned());
        debug!(%kind, count = stored.len(), "Stored new records");
        Ok(stored)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &EntityId,
        patch: Payload,
    ) -> Result<(), PortError> {
        let mut inner = self.inner.lock().await;
        inner.journal.push(JournalEntry::Update {
            kind,
            id: id.clone(),
        });
        inner.check_injected(StoreOperation::Update, kind, Some(id))?;

        let record: &mut StoredRecord = inner
            .data
            .records
            .get_mut(&kind)
            .and_then(|records| records.iter_mut().find(|record| &record.id == id))
            .ok_or_else(|| PortError::NotFound {
                kind,
                id: id.clone(),
            })?;
        record.payload.extend(patch);
        Ok(())
    }

    async fn delete(&self, kind: EntityKind, id: &EntityId) -> Result<(), PortError> {
        let mut inner = self.inner.lock().await;
        inner.journal.push(JournalEntry::Delete {
            kind,
            id: id.clone(),
        });
        inner.check_injected(StoreOperation::Delete, kind, Some(id))?;

        if !inner.data.contains(kind, id) {
            return Err(PortError::NotFound {
                kind,
                id: id.clone(),
            });
        }
        let children: usize = inner.data.child_count(kind, id);
        if children > 0 {
            return Err(PortError::HasChildren {
                kind,
                id: id.clone(),
                children,
            });
        }

        if let Some(records) = inner.data.records.get_mut(&kind) {
            records.retain(|record| &record.id != id);
        }
        Ok(())
    }

    async fn list(&self, kind: EntityKind) -> Result<Vec<StoredRecord>, PortError> {
        let inner = self.inner.lock().await;
        inner.check_injected(StoreOperation::List, kind, None)?;
        Ok(inner.data.records(kind).to_vec())
    }
}
