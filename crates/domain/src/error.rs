// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::decision::{ArtifactKind, DecisionStatus};
use crate::phase::PhaseWindowKind;
use time::OffsetDateTime;

/// Errors that can occur during timeline validation and gating.
///
/// Validation is fail-fast: callers only ever see the first violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A window's start is not strictly before its end.
    InvalidRange {
        /// Name of the offending window.
        window: String,
        /// The configured start.
        start: OffsetDateTime,
        /// The configured end.
        end: OffsetDateTime,
    },
    /// A window starts before its predecessor in the phase sequence ends.
    OutOfOrder {
        /// The earlier window in the sequence.
        predecessor: PhaseWindowKind,
        /// The later window in the sequence.
        successor: PhaseWindowKind,
    },
    /// A revision round does not lie inside the phase's revise window.
    RoundOutOfBounds {
        /// The round number.
        round_number: u32,
    },
    /// Two revision rounds have overlapping windows.
    RoundOverlap {
        /// The first round number.
        first: u32,
        /// The second round number.
        second: u32,
    },
    /// A round number is used more than once within a phase.
    DuplicateRound {
        /// The repeated round number.
        round_number: u32,
    },
    /// A secondary phase starts before the preceding phase has finished.
    PhaseOverlap {
        /// Index of the preceding phase.
        primary: usize,
        /// Index of the phase that starts too early.
        secondary: usize,
    },
    /// The artifact has already received a final decision.
    AlreadyDecided {
        /// The artifact being decided.
        artifact: ArtifactKind,
        /// Its current status.
        status: DecisionStatus,
    },
    /// An action was attempted outside of its gating window.
    OutOfWindow {
        /// Description of the attempted action.
        action: String,
        /// The moment the action was attempted.
        at: OffsetDateTime,
    },
    /// A required date field is empty.
    MissingField {
        /// The field name (e.g. `full_paper.start`).
        field: String,
    },
    /// Round numbers are positive integers.
    InvalidRoundNumber(u32),
    /// Entity kind string is not recognized.
    UnknownEntityKind(String),
    /// Artifact string is not recognized.
    UnknownArtifact(String),
    /// Date arithmetic overflowed while deriving a window end.
    DurationOverflow {
        /// The window whose end could not be computed.
        window: String,
    },
    /// Paper does not exist in the conference.
    PaperNotFound(String),
    /// Research phase does not exist in the conference.
    PhaseNotFound(String),
    /// Revision round does not exist in the conference.
    RoundNotFound(String),
    /// Revision submission does not exist.
    SubmissionNotFound(String),
    /// Feedback item does not exist on the submission.
    FeedbackNotFound {
        /// The submission searched.
        submission_id: String,
        /// The missing feedback item.
        feedback_id: String,
    },
    /// A paper already has a submission for the round.
    DuplicateSubmission {
        /// The paper identifier.
        paper_id: String,
        /// The round identifier.
        round_id: String,
    },
    /// The completed-round watermark only moves forward.
    WatermarkRegression {
        /// Round number currently marked completed.
        current: u32,
        /// Round number that was requested.
        requested: u32,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange { window, start, end } => {
                write!(
                    f,
                    "Invalid range for '{window}': start {start} must be before end {end}"
                )
            }
            Self::OutOfOrder {
                predecessor,
                successor,
            } => {
                write!(
                    f,
                    "'{}' must not start before '{}' ends",
                    successor.as_str(),
                    predecessor.as_str()
                )
            }
            Self::RoundOutOfBounds { round_number } => {
                write!(
                    f,
                    "Revision round {round_number} lies outside the revise window"
                )
            }
            Self::RoundOverlap { first, second } => {
                write!(f, "Revision rounds {first} and {second} overlap")
            }
            Self::DuplicateRound { round_number } => {
                write!(f, "Revision round {round_number} is defined more than once")
            }
            Self::PhaseOverlap { primary, secondary } => {
                write!(
                    f,
                    "Phase {secondary} must start after phase {primary} has finished"
                )
            }
            Self::AlreadyDecided { artifact, status } => {
                write!(
                    f,
                    "{} has already been decided as {}",
                    artifact.as_str(),
                    status.as_str()
                )
            }
            Self::OutOfWindow { action, at } => {
                write!(f, "Cannot {action} at {at}: outside of its window")
            }
            Self::MissingField { field } => write!(f, "Required field '{field}' is empty"),
            Self::InvalidRoundNumber(n) => {
                write!(f, "Invalid round number: {n}. Must be greater than 0")
            }
            Self::UnknownEntityKind(kind) => write!(f, "Unknown entity kind: {kind}"),
            Self::UnknownArtifact(artifact) => write!(f, "Unknown artifact: {artifact}"),
            Self::DurationOverflow { window } => {
                write!(f, "Date arithmetic overflow while computing end of '{window}'")
            }
            Self::PaperNotFound(id) => write!(f, "Paper '{id}' not found"),
            Self::PhaseNotFound(id) => write!(f, "Research phase '{id}' not found"),
            Self::RoundNotFound(id) => write!(f, "Revision round '{id}' not found"),
            Self::SubmissionNotFound(id) => write!(f, "Revision submission '{id}' not found"),
            Self::FeedbackNotFound {
                submission_id,
                feedback_id,
            } => {
                write!(
                    f,
                    "Feedback '{feedback_id}' not found on submission '{submission_id}'"
                )
            }
            Self::DuplicateSubmission { paper_id, round_id } => {
                write!(
                    f,
                    "Paper '{paper_id}' already has a submission for round '{round_id}'"
                )
            }
            Self::WatermarkRegression { current, requested } => {
                write!(
                    f,
                    "Cannot mark round {requested} completed: round {current} is already completed"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
