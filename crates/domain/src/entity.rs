// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity identity and deletion tracking for edit sessions.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// A server-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wraps a server-assigned identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether an entity already exists in the remote store.
///
/// Serialized as an optional `id`: `null` (or absent) for local entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<EntityId>", into = "Option<EntityId>")]
pub enum Identity {
    /// Persisted with a server-assigned id.
    Persisted(EntityId),
    /// Created during this edit session, not yet stored.
    #[default]
    Local,
}

impl Identity {
    /// Shorthand for a persisted identity.
    #[must_use]
    pub fn persisted(id: impl Into<String>) -> Self {
        Self::Persisted(EntityId::new(id))
    }

    /// Returns the persisted id, if any.
    #[must_use]
    pub const fn id(&self) -> Option<&EntityId> {
        match self {
            Self::Persisted(id) => Some(id),
            Self::Local => None,
        }
    }

    /// Returns true if the entity exists remotely.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

impl From<Option<EntityId>> for Identity {
    fn from(id: Option<EntityId>) -> Self {
        id.map_or(Self::Local, Self::Persisted)
    }
}

impl From<Identity> for Option<EntityId> {
    fn from(identity: Identity) -> Self {
        match identity {
            Identity::Persisted(id) => Some(id),
            Identity::Local => None,
        }
    }
}

/// Kinds of entity the remote store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Ticket,
    PricePhase,
    RefundPolicy,
    Session,
    Policy,
    Material,
    RankingFile,
    RankingReference,
    Media,
    Sponsor,
    ResearchPhase,
    RevisionRoundDeadline,
}

impl EntityKind {
    /// Every kind, parents before children.
    pub const ALL: [Self; 12] = [
        Self::ResearchPhase,
        Self::RevisionRoundDeadline,
        Self::Ticket,
        Self::PricePhase,
        Self::RefundPolicy,
        Self::Session,
        Self::Policy,
        Self::Material,
        Self::RankingFile,
        Self::RankingReference,
        Self::Media,
        Self::Sponsor,
    ];

    /// Returns the string representation used by the store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ticket => "ticket",
            Self::PricePhase => "price_phase",
            Self::RefundPolicy => "refund_policy",
            Self::Session => "session",
            Self::Policy => "policy",
            Self::Material => "material",
            Self::RankingFile => "ranking_file",
            Self::RankingReference => "ranking_reference",
            Self::Media => "media",
            Self::Sponsor => "sponsor",
            Self::ResearchPhase => "research_phase",
            Self::RevisionRoundDeadline => "revision_round_deadline",
        }
    }

    /// The kind that owns entities of this kind, if nested.
    #[must_use]
    pub const fn parent(&self) -> Option<Self> {
        match self {
            Self::PricePhase => Some(Self::Ticket),
            Self::RefundPolicy => Some(Self::PricePhase),
            Self::RevisionRoundDeadline => Some(Self::ResearchPhase),
            Self::Ticket
            | Self::Session
            | Self::Policy
            | Self::Material
            | Self::RankingFile
            | Self::RankingReference
            | Self::Media
            | Self::Sponsor
            | Self::ResearchPhase => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::UnknownEntityKind(s.to_string()))
    }
}

/// An entity carrying an [`Identity`] of a known [`EntityKind`].
pub trait Tracked {
    /// The kind the entity is stored as.
    const KIND: EntityKind;

    /// Returns the entity's identity.
    fn identity(&self) -> &Identity;

    /// Calls `visit` for every nested entity, parents before children.
    fn visit_descendants(&self, _visit: &mut dyn FnMut(EntityKind, &Identity)) {}
}

/// Ids explicitly removed by the user during an edit session, per kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeletedIds {
    by_kind: BTreeMap<EntityKind, BTreeSet<EntityId>>,
}

impl DeletedIds {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an id as deleted.
    pub fn mark_deleted(&mut self, kind: EntityKind, id: EntityId) {
        self.by_kind.entry(kind).or_default().insert(id);
    }

    /// Returns the deleted ids of one kind, in stable order.
    #[must_use]
    pub fn ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.by_kind
            .get(&kind)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns true if `id` of `kind` has been deleted.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, id: &EntityId) -> bool {
        self.by_kind.get(&kind).is_some_and(|ids| ids.contains(id))
    }

    /// Returns true if nothing has been deleted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_kind.values().all(BTreeSet::is_empty)
    }

    /// Forgets one id, e.g. after its deletion went through.
    pub fn unmark(&mut self, kind: EntityKind, id: &EntityId) {
        if let Some(ids) = self.by_kind.get_mut(&kind) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_kind.remove(&kind);
            }
        }
    }

    /// Forgets all deletions.
    pub fn clear(&mut self) {
        self.by_kind.clear();
    }

    /// Marks a removed entity and every persisted entity nested inside it.
    ///
    /// Local entities were never stored, so there is nothing to delete.
    pub fn mark_removed<T: Tracked>(&mut self, entity: &T) {
        if let Some(id) = entity.identity().id() {
            self.mark_deleted(T::KIND, id.clone());
        }
        entity.visit_descendants(&mut |kind, identity| {
            if let Some(id) = identity.id() {
                self.mark_deleted(kind, id.clone());
            }
        });
    }
}
