// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Editable conference entities.
//!
//! Each carries an [`Identity`]: persisted entities have a server id,
//! entities added during an edit session do not. Nested collections are
//! owned by their parent (ticket -> price phase -> refund policy).

use crate::entity::{EntityKind, Identity, Tracked};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A ticket type sold for the conference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default)]
    pub id: Identity,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base price in minor currency units.
    pub price: u64,
    pub total_slot: u32,
    #[serde(default)]
    pub is_author_ticket: bool,
    #[serde(default)]
    pub phases: Vec<PricePhase>,
}

/// A pricing period of a ticket (early bird, regular, late).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PricePhase {
    #[serde(default)]
    pub id: Identity,
    pub name: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    /// Percentage of the base price applied during this phase.
    pub apply_percent: u16,
    pub total_slot: u32,
    #[serde(default)]
    pub refund_policies: Vec<RefundPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefundPolicy {
    #[serde(default)]
    pub id: Identity,
    pub percent_refund: u8,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub refund_deadline: Option<OffsetDateTime>,
}

/// A scheduled talk or track slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub id: Identity,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub id: Identity,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Downloadable conference material.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub id: Identity,
    #[serde(default)]
    pub description: String,
    pub file_url: String,
}

/// Evidence of the conference's ranking (e.g. a CORE certificate).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankingFile {
    #[serde(default)]
    pub id: Identity,
    #[serde(default)]
    pub description: String,
    pub file_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankingReference {
    #[serde(default)]
    pub id: Identity,
    pub reference_name: String,
    pub reference_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub id: Identity,
    pub media_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sponsor {
    #[serde(default)]
    pub id: Identity,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

impl Tracked for Ticket {
    const KIND: EntityKind = EntityKind::Ticket;

    fn identity(&self) -> &Identity {
        &self.id
    }

    fn visit_descendants(&self, visit: &mut dyn FnMut(EntityKind, &Identity)) {
        for phase in &self.phases {
            visit(PricePhase::KIND, &phase.id);
            phase.visit_descendants(visit);
        }
    }
}

impl Tracked for PricePhase {
    const KIND: EntityKind = EntityKind::PricePhase;

    fn identity(&self) -> &Identity {
        &self.id
    }

    fn visit_descendants(&self, visit: &mut dyn FnMut(EntityKind, &Identity)) {
        for policy in &self.refund_policies {
            visit(RefundPolicy::KIND, &policy.id);
        }
    }
}

macro_rules! impl_tracked_leaf {
    ($($entity:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Tracked for $entity {
                const KIND: EntityKind = EntityKind::$kind;

                fn identity(&self) -> &Identity {
                    &self.id
                }
            }
        )+
    };
}

impl_tracked_leaf!(
    RefundPolicy => RefundPolicy,
    Session => Session,
    Policy => Policy,
    Material => Material,
    RankingFile => RankingFile,
    RankingReference => RankingReference,
    Media => Media,
    Sponsor => Sponsor,
);
