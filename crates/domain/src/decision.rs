// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Decision status tracking and window-gated transitions.
//!
//! Each reviewed artifact moves from `Pending` to `Accepted` or `Rejected`
//! exactly once, and only while its decision window is open. A decision,
//! once made, is final.

use crate::error::DomainError;
use crate::phase::{PhaseWindowKind, ResearchPhase};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The artifacts a head reviewer decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Abstract,
    FullPaper,
    RevisionPaper,
    CameraReady,
}

impl ArtifactKind {
    /// Returns the string representation of the artifact.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::FullPaper => "full_paper",
            Self::RevisionPaper => "revision_paper",
            Self::CameraReady => "camera_ready",
        }
    }

    /// The phase window that gates decisions on this artifact.
    #[must_use]
    pub const fn decision_window(&self) -> PhaseWindowKind {
        match self {
            Self::Abstract => PhaseWindowKind::AbstractDecideStatus,
            Self::FullPaper => PhaseWindowKind::FullPaperDecideStatus,
            Self::RevisionPaper => PhaseWindowKind::RevisionPaperDecideStatus,
            Self::CameraReady => PhaseWindowKind::CameraReadyDecideStatus,
        }
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abstract" => Ok(Self::Abstract),
            "full_paper" => Ok(Self::FullPaper),
            "revision_paper" => Ok(Self::RevisionPaper),
            "camera_ready" => Ok(Self::CameraReady),
            _ => Err(DomainError::UnknownArtifact(s.to_string())),
        }
    }
}

/// Status of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    /// Awaiting a decision
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl DecisionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true once a decision has been made.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// The outcome a head reviewer may choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    /// The status this decision produces.
    #[must_use]
    pub const fn status(&self) -> DecisionStatus {
        match self {
            Self::Accept => DecisionStatus::Accepted,
            Self::Reject => DecisionStatus::Rejected,
        }
    }
}

/// Decision statuses of one paper's artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtifactStatuses {
    #[serde(default)]
    pub abstract_status: DecisionStatus,
    #[serde(default)]
    pub full_paper_status: DecisionStatus,
    #[serde(default)]
    pub revision_paper_status: DecisionStatus,
    #[serde(default)]
    pub camera_ready_status: DecisionStatus,
}

impl ArtifactStatuses {
    /// Returns the status of one artifact.
    #[must_use]
    pub const fn get(&self, artifact: ArtifactKind) -> DecisionStatus {
        match artifact {
            ArtifactKind::Abstract => self.abstract_status,
            ArtifactKind::FullPaper => self.full_paper_status,
            ArtifactKind::RevisionPaper => self.revision_paper_status,
            ArtifactKind::CameraReady => self.camera_ready_status,
        }
    }

    /// Overwrites the status of one artifact.
    pub const fn set(&mut self, artifact: ArtifactKind, status: DecisionStatus) {
        match artifact {
            ArtifactKind::Abstract => self.abstract_status = status,
            ArtifactKind::FullPaper => self.full_paper_status = status,
            ArtifactKind::RevisionPaper => self.revision_paper_status = status,
            ArtifactKind::CameraReady => self.camera_ready_status = status,
        }
    }
}

/// Validates a decision on an artifact and returns its new status.
///
/// The "already decided" check comes first: a final status is rejected
/// whether or not the window is open.
///
/// # Arguments
///
/// * `artifact` - The artifact being decided
/// * `current` - Its current status
/// * `decision` - The requested outcome
/// * `phase` - The phase whose decision window applies
/// * `now` - The instant of the decision
///
/// # Errors
///
/// Returns an error if:
/// - The artifact is no longer `Pending` (`AlreadyDecided`)
/// - The decision window is not configured (`MissingField`)
/// - `now` lies outside the decision window (`OutOfWindow`)
pub fn decide_status(
    artifact: ArtifactKind,
    current: DecisionStatus,
    decision: Decision,
    phase: &ResearchPhase,
    now: OffsetDateTime,
) -> Result<DecisionStatus, DomainError> {
    if current.is_final() {
        return Err(DomainError::AlreadyDecided {
            artifact,
            status: current,
        });
    }

    let kind = artifact.decision_window();
    let window = phase
        .window(kind)
        .as_time_window()
        .ok_or_else(|| DomainError::MissingField {
            field: kind.as_str().to_string(),
        })?;

    if !window.contains(now) {
        return Err(DomainError::OutOfWindow {
            action: format!("decide {}", artifact.as_str()),
            at: now,
        });
    }

    Ok(decision.status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseGraphVariant;
    use crate::time_window::PhaseWindow;
    use time::macros::datetime;

    fn phase_with_full_paper_decision() -> ResearchPhase {
        ResearchPhase::new("Main", PhaseGraphVariant::Full).with_window(
            PhaseWindowKind::FullPaperDecideStatus,
            PhaseWindow::dated(
                datetime!(2026-04-01 0:00 UTC),
                datetime!(2026-04-10 0:00 UTC),
            ),
        )
    }

    #[test]
    fn test_decide_inside_window() {
        let phase = phase_with_full_paper_decision();
        let result = decide_status(
            ArtifactKind::FullPaper,
            DecisionStatus::Pending,
            Decision::Accept,
            &phase,
            datetime!(2026-04-05 0:00 UTC),
        );
        assert_eq!(result, Ok(DecisionStatus::Accepted));
    }

    #[test]
    fn test_already_decided_wins_over_window() {
        let phase = phase_with_full_paper_decision();
        for now in [
            datetime!(2026-04-05 0:00 UTC),
            datetime!(2026-05-05 0:00 UTC),
        ] {
            let result = decide_status(
                ArtifactKind::FullPaper,
                DecisionStatus::Accepted,
                Decision::Reject,
                &phase,
                now,
            );
            assert!(matches!(
                result,
                Err(DomainError::AlreadyDecided {
                    artifact: ArtifactKind::FullPaper,
                    status: DecisionStatus::Accepted,
                })
            ));
        }
    }

    #[test]
    fn test_decide_outside_window() {
        let phase = phase_with_full_paper_decision();
        let result = decide_status(
            ArtifactKind::FullPaper,
            DecisionStatus::Pending,
            Decision::Reject,
            &phase,
            datetime!(2026-04-10 0:00:01 UTC),
        );
        assert!(matches!(result, Err(DomainError::OutOfWindow { .. })));
    }

    #[test]
    fn test_decide_without_window_configured() {
        let phase = phase_with_full_paper_decision();
        let result = decide_status(
            ArtifactKind::CameraReady,
            DecisionStatus::Pending,
            Decision::Accept,
            &phase,
            datetime!(2026-04-05 0:00 UTC),
        );
        assert!(matches!(result, Err(DomainError::MissingField { .. })));
    }

    #[test]
    fn test_artifact_statuses_are_independent() {
        let mut statuses = ArtifactStatuses::default();
        statuses.set(ArtifactKind::Abstract, DecisionStatus::Accepted);
        assert_eq!(statuses.get(ArtifactKind::Abstract), DecisionStatus::Accepted);
        assert_eq!(statuses.get(ArtifactKind::FullPaper), DecisionStatus::Pending);
    }

    #[test]
    fn test_artifact_string_round_trip() {
        for artifact in [
            ArtifactKind::Abstract,
            ArtifactKind::FullPaper,
            ArtifactKind::RevisionPaper,
            ArtifactKind::CameraReady,
        ] {
            assert_eq!(artifact.as_str().parse::<ArtifactKind>(), Ok(artifact));
        }
        assert!("poster".parse::<ArtifactKind>().is_err());
    }
}
