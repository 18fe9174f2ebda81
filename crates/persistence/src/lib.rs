// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence for conference edits.
//!
//! This crate reconciles an edited conference draft against a remote
//! store reached through the [`PersistencePort`] trait.
//!
//! ## Submit Flow
//!
//! [`submit_edit`] validates the draft's research phases, reconciles every
//! entity family, and refetches canonical records whenever a store call was
//! attempted. Ids of newly created records are only known after that
//! refetch.
//!
//! ## Reconciliation Order
//!
//! - Deletes run innermost first (refund policy, price phase, ticket)
//! - Updates and creates run outermost first
//! - Creates are batched per kind and are all-or-nothing
//! - Delete and update failures are collected, never retried
//!
//! ## Stores
//!
//! [`InMemoryStore`] implements the port in process. It enforces parent
//! and child references, journals every call and can be saved to and
//! loaded from a JSON file.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod hydrate;
mod memory;
mod node;
mod port;
mod reconcile;
mod submit;

#[cfg(test)]
mod tests;

pub use error::{FailureCause, PortError, ReconcileError};
pub use hydrate::RecordSet;
pub use memory::{InMemoryStore, JournalEntry, StoreOperation};
pub use node::{EntityNode, child_field, diff_payload, family_kinds};
pub use port::{NewRecord, Payload, PersistencePort, StoredRecord};
pub use reconcile::{
    FamilyPlan, Operation, ReconcileFailure, ReconcileReport, ReconcileStep, reconcile,
    reconcile_draft,
};
pub use submit::submit_edit;
