// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Turning an edited draft into store operations.
//!
//! Each entity family (a top-level kind with its nested kinds) is
//! reconciled in three steps:
//!
//! 1. Deletes, innermost kind first. A parent is never deleted while its
//!    children still reference it.
//! 2. Updates, outermost level first, for persisted entities whose fields
//!    differ from the baseline.
//! 3. Creates, outermost level first, as one batch per level. Nested
//!    records take the id of their persisted or newly created parent.
//!
//! Operations of one step and level run concurrently and are awaited
//! together before the next level starts. Delete and update failures are
//! collected per entity; a failed create batch is a single failure and its
//! new descendants are skipped. Nothing is retried or undone.

use crate::error::{FailureCause, PortError, ReconcileError};
use crate::node::{EntityNode, diff_payload, family_kinds};
use crate::port::{NewRecord, Payload, PersistencePort, StoredRecord};
use conftrack::{ConferenceDraft, EditSession};
use conftrack_domain::{DeletedIds, EntityId, EntityKind, Identity, Tracked};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// The step of a reconciliation an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileStep {
    Delete,
    Update,
    Create,
}

impl ReconcileStep {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Update => "update",
            Self::Create => "create",
        }
    }
}

impl std::fmt::Display for ReconcileStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A store operation that went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Delete {
        kind: EntityKind,
        id: EntityId,
    },
    Update {
        kind: EntityKind,
        id: EntityId,
        fields: Vec<String>,
    },
    /// One batch; `ids` are the assigned ids in the order sent.
    Create {
        kind: EntityKind,
        ids: Vec<EntityId>,
    },
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delete { kind, id } => write!(f, "delete {kind} '{id}'"),
            Self::Update { kind, id, fields } => {
                write!(f, "update {kind} '{id}' ({})", fields.join(", "))
            }
            Self::Create { kind, ids } => write!(f, "create {} {kind} record(s)", ids.len()),
        }
    }
}

/// An operation that did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileFailure {
    pub step: ReconcileStep,
    pub entity_kind: EntityKind,
    /// The persisted id, or `None` for a create.
    pub entity_id: Option<EntityId>,
    pub cause: FailureCause,
}

impl std::fmt::Display for ReconcileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.entity_id {
            Some(id) => write!(
                f,
                "{} {} '{id}' failed: {}",
                self.step, self.entity_kind, self.cause
            ),
            None => write!(
                f,
                "{} {} failed: {}",
                self.step, self.entity_kind, self.cause
            ),
        }
    }
}

/// The outcome of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Successful operations in the order they completed.
    pub operations: Vec<Operation>,
    pub failures: Vec<ReconcileFailure>,
    /// True once any store call was attempted. Local ids are stale until
    /// canonical records are fetched again.
    pub needs_refresh: bool,
}

impl ReconcileReport {
    /// Returns true if no operation failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Appends another report.
    pub fn merge(&mut self, other: Self) {
        self.operations.extend(other.operations);
        self.failures.extend(other.failures);
        self.needs_refresh |= other.needs_refresh;
    }

    /// The ids whose deletion went through.
    pub fn deleted(&self) -> impl Iterator<Item = (EntityKind, &EntityId)> {
        self.operations.iter().filter_map(|operation| match operation {
            Operation::Delete { kind, id } => Some((*kind, id)),
            Operation::Update { .. } | Operation::Create { .. } => None,
        })
    }

    fn fail(
        &mut self,
        step: ReconcileStep,
        entity_kind: EntityKind,
        entity_id: Option<EntityId>,
        cause: FailureCause,
    ) {
        let failure = ReconcileFailure {
            step,
            entity_kind,
            entity_id,
            cause,
        };
        warn!(%failure, "Reconcile operation failed");
        self.failures.push(failure);
    }
}

/// One entity family converted to record trees.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyPlan {
    root: EntityKind,
    local: Vec<EntityNode>,
    canonical: HashMap<(EntityKind, EntityId), Payload>,
}

impl FamilyPlan {
    /// Builds the plan for one top-level collection.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::Payload` if an entity does not serialize.
    pub fn new<T: Tracked + Serialize>(local: &[T], baseline: &[T]) -> Result<Self, ReconcileError> {
        let mut canonical: HashMap<(EntityKind, EntityId), Payload> = HashMap::new();
        index_canonical(&EntityNode::from_entities(baseline)?, &mut canonical);
        Ok(Self {
            root: T::KIND,
            local: EntityNode::from_entities(local)?,
            canonical,
        })
    }

    /// Runs the three steps against the port.
    pub async fn execute<P: PersistencePort + ?Sized>(
        &self,
        port: &P,
        deleted: &DeletedIds,
    ) -> ReconcileReport {
        let kinds: Vec<EntityKind> = family_kinds(self.root);
        let mut report: ReconcileReport = ReconcileReport::default();

        for kind in kinds.iter().rev() {
            delete_level(port, *kind, deleted, &mut report).await;
        }

        let mut level: Vec<&EntityNode> = self.local.iter().collect();
        while !level.is_empty() {
            self.update_level(port, &level, deleted, &mut report).await;
            level = level.iter().flat_map(|node| node.children.iter()).collect();
        }

        let mut level: Vec<(&EntityNode, ParentRef)> = self
            .local
            .iter()
            .map(|node| (node, ParentRef::Root))
            .collect();
        for kind in &kinds {
            if level.is_empty() {
                break;
            }
            level = create_level(port, *kind, level, &mut report).await;
        }

        info!(
            kind = %self.root,
            operations = report.operations.len(),
            failures = report.failures.len(),
            "Reconciled entity family"
        );
        report
    }

    async fn update_level<P: PersistencePort + ?Sized>(
        &self,
        port: &P,
        level: &[&EntityNode],
        deleted: &DeletedIds,
        report: &mut ReconcileReport,
    ) {
        let patches: Vec<(EntityKind, &EntityId, Payload)> = level
            .iter()
            .filter_map(|node| {
                let id: &EntityId = node.identity.id()?;
                if deleted.contains(node.kind, id) {
                    return None;
                }
                let patch: Payload = self
                    .canonical
                    .get(&(node.kind, id.clone()))
                    .map_or_else(|| node.payload.clone(), |base| diff_payload(&node.payload, base));
                (!patch.is_empty()).then_some((node.kind, id, patch))
            })
            .collect();
        if patches.is_empty() {
            return;
        }

        report.needs_refresh = true;
        let results = join_all(patches.iter().map(|(kind, id, patch)| {
            debug!(%kind, %id, fields = patch.len(), "Updating record");
            port.update(*kind, id, patch.clone())
        }))
        .await;

        for ((kind, id, patch), result) in patches.into_iter().zip(results) {
            match result {
                Ok(()) => report.operations.push(Operation::Update {
                    kind,
                    id: id.clone(),
                    fields: patch.keys().cloned().collect(),
                }),
                Err(err) => report.fail(ReconcileStep::Update, kind, Some(id.clone()), err.into()),
            }
        }
    }
}

/// Where a node to be created gets its parent id from.
#[derive(Debug, Clone)]
enum ParentRef {
    Root,
    Stored(EntityId),
    /// The parent of this kind was not created.
    Missing(EntityKind),
}

async fn delete_level<P: PersistencePort + ?Sized>(
    port: &P,
    kind: EntityKind,
    deleted: &DeletedIds,
    report: &mut ReconcileReport,
) {
    let ids: Vec<EntityId> = deleted.ids(kind);
    if ids.is_empty() {
        return;
    }

    report.needs_refresh = true;
    let results = join_all(ids.iter().map(|id| {
        debug!(%kind, %id, "Deleting record");
        port.delete(kind, id)
    }))
    .await;

    for (id, result) in ids.into_iter().zip(results) {
        match result {
            Ok(()) => report.operations.push(Operation::Delete { kind, id }),
            // Already gone, as after a retried delete whose reply was lost
            Err(PortError::NotFound { .. }) => {
                debug!(%kind, %id, "Record already deleted");
                report.operations.push(Operation::Delete { kind, id });
            }
            Err(err) => report.fail(ReconcileStep::Delete, kind, Some(id), err.into()),
        }
    }
}

/// Creates the new nodes of one level and returns the next level.
async fn create_level<'a, P: PersistencePort + ?Sized>(
    port: &P,
    kind: EntityKind,
    level: Vec<(&'a EntityNode, ParentRef)>,
    report: &mut ReconcileReport,
) -> Vec<(&'a EntityNode, ParentRef)> {
    let mut next: Vec<(&'a EntityNode, ParentRef)> = Vec::new();
    let mut batch: Vec<&'a EntityNode> = Vec::new();
    let mut records: Vec<NewRecord> = Vec::new();

    for (node, parent) in level {
        match (&node.identity, parent) {
            (Identity::Persisted(id), _) => {
                push_children(&mut next, node, &ParentRef::Stored(id.clone()));
            }
            (Identity::Local, ParentRef::Missing(parent)) => {
                report.fail(
                    ReconcileStep::Create,
                    kind,
                    None,
                    FailureCause::ParentNotCreated { parent },
                );
                push_children(&mut next, node, &ParentRef::Missing(kind));
            }
            (Identity::Local, ParentRef::Root) => {
                records.push(NewRecord {
                    parent_id: None,
                    payload: node.payload.clone(),
                });
                batch.push(node);
            }
            (Identity::Local, ParentRef::Stored(parent_id)) => {
                records.push(NewRecord {
                    parent_id: Some(parent_id),
                    payload: node.payload.clone(),
                });
                batch.push(node);
            }
        }
    }
    if batch.is_empty() {
        return next;
    }

    report.needs_refresh = true;
    let sent: usize = records.len();
    debug!(%kind, count = sent, "Creating records");
    match port.create(kind, records).await.and_then(|stored| {
        if stored.len() == sent {
            Ok(stored)
        } else {
            Err(PortError::BatchMismatch {
                kind,
                sent,
                returned: stored.len(),
            })
        }
    }) {
        Ok(stored) => {
            let ids: Vec<EntityId> = stored.into_iter().map(|record: StoredRecord| record.id).collect();
            for (node, id) in batch.iter().zip(&ids) {
                push_children(&mut next, node, &ParentRef::Stored(id.clone()));
            }
            report.operations.push(Operation::Create { kind, ids });
        }
        Err(err) => {
            report.fail(ReconcileStep::Create, kind, None, err.into());
            for node in batch {
                push_children(&mut next, node, &ParentRef::Missing(kind));
            }
        }
    }
    next
}

fn push_children<'a>(
    next: &mut Vec<(&'a EntityNode, ParentRef)>,
    node: &'a EntityNode,
    parent: &ParentRef,
) {
    next.extend(node.children.iter().map(|child| (child, parent.clone())));
}

fn index_canonical(nodes: &[EntityNode], index: &mut HashMap<(EntityKind, EntityId), Payload>) {
    for node in nodes {
        if let Some(id) = node.identity.id() {
            index.insert((node.kind, id.clone()), node.payload.clone());
        }
        index_canonical(&node.children, index);
    }
}

/// Reconciles one top-level collection against its baseline.
///
/// # Errors
///
/// Returns `ReconcileError::Payload` before any store call if an entity
/// does not serialize.
pub async fn reconcile<P, T>(
    port: &P,
    local: &[T],
    baseline: &[T],
    deleted: &DeletedIds,
) -> Result<ReconcileReport, ReconcileError>
where
    P: PersistencePort + ?Sized,
    T: Tracked + Serialize,
{
    Ok(FamilyPlan::new(local, baseline)?.execute(port, deleted).await)
}

/// Reconciles every collection of an edit session, family by family.
///
/// # Errors
///
/// Returns `ReconcileError::Payload` before any store call if an entity
/// does not serialize.
pub async fn reconcile_draft<P: PersistencePort + ?Sized>(
    port: &P,
    session: &EditSession,
) -> Result<ReconcileReport, ReconcileError> {
    let plans: Vec<FamilyPlan> = family_plans(&session.draft, &session.baseline)?;
    info!(
        conference_id = %session.conference_id,
        families = plans.len(),
        "Reconciling conference draft"
    );

    let mut report: ReconcileReport = ReconcileReport::default();
    for plan in &plans {
        report.merge(plan.execute(port, &session.deleted).await);
    }
    Ok(report)
}

fn family_plans(
    draft: &ConferenceDraft,
    baseline: &ConferenceDraft,
) -> Result<Vec<FamilyPlan>, ReconcileError> {
    Ok(vec![
        FamilyPlan::new(&draft.research_phases, &baseline.research_phases)?,
        FamilyPlan::new(&draft.tickets, &baseline.tickets)?,
        FamilyPlan::new(&draft.sessions, &baseline.sessions)?,
        FamilyPlan::new(&draft.policies, &baseline.policies)?,
        FamilyPlan::new(&draft.materials, &baseline.materials)?,
        FamilyPlan::new(&draft.ranking_files, &baseline.ranking_files)?,
        FamilyPlan::new(&draft.ranking_references, &baseline.ranking_references)?,
        FamilyPlan::new(&draft.media, &baseline.media)?,
        FamilyPlan::new(&draft.sponsors, &baseline.sponsors)?,
    ])
}
