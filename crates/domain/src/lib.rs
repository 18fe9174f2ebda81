// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod clock;
mod decision;
mod entities;
mod entity;
mod error;
mod phase;
mod revision_round;
mod revision_submission;
mod time_window;
mod validation;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use decision::{ArtifactKind, ArtifactStatuses, Decision, DecisionStatus, decide_status};
pub use entity::{DeletedIds, EntityId, EntityKind, Identity, Tracked};
pub use revision_round::{RevisionRound, RoundNumber, RoundState};
pub use revision_submission::{
    AuthorResponse, FeedbackGate, FeedbackItem, RevisionSubmission, RevisionSubmissionTracker,
    Watermark,
};
pub use time_window::{PhaseWindow, TimeWindow};

// Re-export public types
pub use entities::{
    Material, Media, Policy, PricePhase, RankingFile, RankingReference, RefundPolicy, Session,
    Sponsor, Ticket,
};
pub use error::DomainError;
pub use phase::{PhaseGraphVariant, PhaseWindowKind, ResearchPhase};
pub use validation::{validate_phase, validate_phase_sequence, validate_round_set};
