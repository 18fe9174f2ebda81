// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use conftrack_domain::{DomainError, EntityId, EntityKind};
use thiserror::Error;

/// Errors reported by a persistence port for a single call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortError {
    /// The record does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: EntityId },

    /// A parent cannot be deleted while nested records still reference it.
    #[error("{kind} '{id}' still has {children} nested record(s)")]
    HasChildren {
        kind: EntityKind,
        id: EntityId,
        children: usize,
    },

    /// A nested record was created without an existing parent.
    #[error("{kind} record references missing parent {parent_id:?}")]
    MissingParent {
        kind: EntityKind,
        parent_id: Option<EntityId>,
    },

    /// The store returned a different number of records than it was sent.
    #[error("Store returned {returned} {kind} record(s) for {sent} sent")]
    BatchMismatch {
        kind: EntityKind,
        sent: usize,
        returned: usize,
    },

    /// The store refused the call.
    #[error("Store rejected {operation} on {kind}: {message}")]
    Rejected {
        operation: String,
        kind: EntityKind,
        message: String,
    },

    /// Reading or writing the backing file failed.
    #[error("Store I/O error: {0}")]
    Io(String),

    /// The backing file is not a valid store document.
    #[error("Store serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for PortError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PortError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Why one reconciliation operation did not happen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FailureCause {
    /// The port call failed.
    #[error(transparent)]
    Port(#[from] PortError),

    /// The entity's parent could not be created, so it was never sent.
    #[error("parent {parent} was not created")]
    ParentNotCreated { parent: EntityKind },
}

/// Errors that stop a submit before or after reconciliation.
///
/// Per-entity failures during reconciliation are not errors; they are
/// collected in the report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The draft violates a timeline rule; nothing was sent.
    #[error("Draft rejected: {0}")]
    Validation(#[from] DomainError),

    /// An entity could not be converted to or from a record payload.
    #[error("Invalid {kind} payload: {message}")]
    Payload { kind: EntityKind, message: String },

    /// Canonical records could not be fetched after reconciliation.
    #[error("Failed to refetch {kind} records: {source}")]
    Refetch {
        kind: EntityKind,
        #[source]
        source: PortError,
    },
}
