// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The phase graph of a research conference edition.
//!
//! A phase is a fixed sequence of sub-windows:
//!
//! ```text
//! registration -> abstract decision -> full paper -> review
//!   -> full-paper decision -> revise -> revision decision
//!   -> camera ready -> author payment
//! ```
//!
//! The camera-ready decision window sits outside the sequence; it only
//! gates camera-ready decisions. Revision rounds live inside `revise`.

use crate::entity::{EntityKind, Identity, Tracked};
use crate::revision_round::RevisionRound;
use crate::time_window::PhaseWindow;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Names of the sub-windows of a research phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseWindowKind {
    Registration,
    AbstractDecideStatus,
    FullPaper,
    Review,
    FullPaperDecideStatus,
    Revise,
    RevisionPaperDecideStatus,
    CameraReady,
    CameraReadyDecideStatus,
    AuthorPayment,
}

impl PhaseWindowKind {
    /// The strictly ordered windows of a phase.
    pub const SEQUENCE: [Self; 9] = [
        Self::Registration,
        Self::AbstractDecideStatus,
        Self::FullPaper,
        Self::Review,
        Self::FullPaperDecideStatus,
        Self::Revise,
        Self::RevisionPaperDecideStatus,
        Self::CameraReady,
        Self::AuthorPayment,
    ];

    /// Returns the field name of this window.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::AbstractDecideStatus => "abstract_decide_status",
            Self::FullPaper => "full_paper",
            Self::Review => "review",
            Self::FullPaperDecideStatus => "full_paper_decide_status",
            Self::Revise => "revise",
            Self::RevisionPaperDecideStatus => "revision_paper_decide_status",
            Self::CameraReady => "camera_ready",
            Self::CameraReadyDecideStatus => "camera_ready_decide_status",
            Self::AuthorPayment => "author_payment",
        }
    }
}

impl std::fmt::Display for PhaseWindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which windows a phase must configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseGraphVariant {
    /// Every sequential window, including author payment.
    #[default]
    Full,
    /// Author payment is optional.
    Standard,
}

impl PhaseGraphVariant {
    /// Returns true if `kind` must be dated for a phase of this variant.
    #[must_use]
    pub const fn requires(&self, kind: PhaseWindowKind) -> bool {
        match kind {
            PhaseWindowKind::CameraReadyDecideStatus => false,
            PhaseWindowKind::AuthorPayment => matches!(self, Self::Full),
            _ => true,
        }
    }
}

/// One research phase (an edition's set of sequential review windows).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResearchPhase {
    #[serde(default)]
    pub id: Identity,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub variant: PhaseGraphVariant,
    #[serde(default)]
    pub registration: PhaseWindow,
    #[serde(default)]
    pub abstract_decide_status: PhaseWindow,
    #[serde(default)]
    pub full_paper: PhaseWindow,
    #[serde(default)]
    pub review: PhaseWindow,
    #[serde(default)]
    pub full_paper_decide_status: PhaseWindow,
    #[serde(default)]
    pub revise: PhaseWindow,
    #[serde(default)]
    pub revision_paper_decide_status: PhaseWindow,
    #[serde(default)]
    pub camera_ready: PhaseWindow,
    #[serde(default)]
    pub camera_ready_decide_status: PhaseWindow,
    #[serde(default)]
    pub author_payment: PhaseWindow,
    #[serde(default)]
    pub revision_rounds: Vec<RevisionRound>,
}

impl ResearchPhase {
    /// Creates a local phase with every window undated.
    #[must_use]
    pub fn new(name: &str, variant: PhaseGraphVariant) -> Self {
        Self {
            name: name.to_string(),
            variant,
            ..Self::default()
        }
    }

    /// Returns the configured window of the given kind.
    #[must_use]
    pub const fn window(&self, kind: PhaseWindowKind) -> &PhaseWindow {
        match kind {
            PhaseWindowKind::Registration => &self.registration,
            PhaseWindowKind::AbstractDecideStatus => &self.abstract_decide_status,
            PhaseWindowKind::FullPaper => &self.full_paper,
            PhaseWindowKind::Review => &self.review,
            PhaseWindowKind::FullPaperDecideStatus => &self.full_paper_decide_status,
            PhaseWindowKind::Revise => &self.revise,
            PhaseWindowKind::RevisionPaperDecideStatus => &self.revision_paper_decide_status,
            PhaseWindowKind::CameraReady => &self.camera_ready,
            PhaseWindowKind::CameraReadyDecideStatus => &self.camera_ready_decide_status,
            PhaseWindowKind::AuthorPayment => &self.author_payment,
        }
    }

    /// Returns the configured window of the given kind for editing.
    pub const fn window_mut(&mut self, kind: PhaseWindowKind) -> &mut PhaseWindow {
        match kind {
            PhaseWindowKind::Registration => &mut self.registration,
            PhaseWindowKind::AbstractDecideStatus => &mut self.abstract_decide_status,
            PhaseWindowKind::FullPaper => &mut self.full_paper,
            PhaseWindowKind::Review => &mut self.review,
            PhaseWindowKind::FullPaperDecideStatus => &mut self.full_paper_decide_status,
            PhaseWindowKind::Revise => &mut self.revise,
            PhaseWindowKind::RevisionPaperDecideStatus => &mut self.revision_paper_decide_status,
            PhaseWindowKind::CameraReady => &mut self.camera_ready,
            PhaseWindowKind::CameraReadyDecideStatus => &mut self.camera_ready_decide_status,
            PhaseWindowKind::AuthorPayment => &mut self.author_payment,
        }
    }

    /// Replaces the window of the given kind, builder style.
    #[must_use]
    pub fn with_window(mut self, kind: PhaseWindowKind, window: PhaseWindow) -> Self {
        *self.window_mut(kind) = window;
        self
    }

    /// The end of the last dated window in the sequence.
    ///
    /// Author payment when configured, otherwise camera ready.
    #[must_use]
    pub fn final_end(&self) -> Option<OffsetDateTime> {
        self.author_payment.end().or_else(|| self.camera_ready.end())
    }

    /// Returns a revision round by its persisted id.
    #[must_use]
    pub fn round_by_id(&self, id: &str) -> Option<&RevisionRound> {
        self.revision_rounds
            .iter()
            .find(|round| round.id.id().is_some_and(|rid| rid.as_str() == id))
    }
}

impl Tracked for ResearchPhase {
    const KIND: EntityKind = EntityKind::ResearchPhase;

    fn identity(&self) -> &Identity {
        &self.id
    }

    fn visit_descendants(&self, visit: &mut dyn FnMut(EntityKind, &Identity)) {
        for round in &self.revision_rounds {
            visit(RevisionRound::KIND, &round.id);
        }
    }
}
