// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use conftrack_audit::{AuditEvent, StateSnapshot};
use conftrack_domain::{
    ArtifactKind, ArtifactStatuses, DomainError, ResearchPhase, RevisionSubmission,
    RevisionSubmissionTracker, RoundNumber, Watermark,
};
use serde::{Deserialize, Serialize};

/// A paper under review and the decision status of each of its artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub paper_id: String,
    /// Persisted id of the research phase the paper was submitted to.
    pub phase_id: String,
    #[serde(default)]
    pub statuses: ArtifactStatuses,
}

impl Paper {
    /// Creates a paper with every artifact pending.
    #[must_use]
    pub fn new(paper_id: &str, phase_id: &str) -> Self {
        Self {
            paper_id: paper_id.to_string(),
            phase_id: phase_id.to_string(),
            statuses: ArtifactStatuses::default(),
        }
    }

    /// Converts the paper's statuses to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let statuses: Vec<String> = [
            ArtifactKind::Abstract,
            ArtifactKind::FullPaper,
            ArtifactKind::RevisionPaper,
            ArtifactKind::CameraReady,
        ]
        .into_iter()
        .map(|artifact| {
            format!(
                "{}={}",
                artifact.as_str(),
                self.statuses.get(artifact).as_str()
            )
        })
        .collect();
        StateSnapshot::new(format!("paper={},{}", self.paper_id, statuses.join(",")))
    }
}

/// The review state of one conference.
///
/// Research phases are held in edition order. Papers, submissions and the
/// completed-round watermark refer to phases and rounds by persisted id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// The conference this state is scoped to.
    pub conference_id: String,
    #[serde(default)]
    pub phases: Vec<ResearchPhase>,
    #[serde(default)]
    pub papers: Vec<Paper>,
    #[serde(default)]
    pub submissions: Vec<RevisionSubmission>,
    /// The revision round currently marked completed, if any.
    #[serde(default)]
    pub completed_round_id: Option<String>,
}

impl State {
    /// Creates an empty state for a conference.
    #[must_use]
    pub const fn new(conference_id: String) -> Self {
        Self {
            conference_id,
            phases: Vec::new(),
            papers: Vec::new(),
            submissions: Vec::new(),
            completed_round_id: None,
        }
    }

    /// Looks up a paper.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PaperNotFound` if it does not exist.
    pub fn paper(&self, paper_id: &str) -> Result<&Paper, DomainError> {
        self.papers
            .iter()
            .find(|paper| paper.paper_id == paper_id)
            .ok_or_else(|| DomainError::PaperNotFound(paper_id.to_string()))
    }

    /// Looks up a research phase by persisted id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PhaseNotFound` if it does not exist.
    pub fn phase(&self, phase_id: &str) -> Result<&ResearchPhase, DomainError> {
        self.phases
            .iter()
            .find(|phase| phase.id.id().is_some_and(|id| id.as_str() == phase_id))
            .ok_or_else(|| DomainError::PhaseNotFound(phase_id.to_string()))
    }

    /// Returns the research phase that owns a revision round.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RoundNotFound` if no phase has the round.
    pub fn phase_for_round(&self, round_id: &str) -> Result<&ResearchPhase, DomainError> {
        self.phases
            .iter()
            .find(|phase| phase.round_by_id(round_id).is_some())
            .ok_or_else(|| DomainError::RoundNotFound(round_id.to_string()))
    }

    /// Returns where a revision round sits in the conference's edition order.
    ///
    /// Round numbers restart in every phase, so rounds compare by phase
    /// position first and round number second.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RoundNotFound` if no phase has the round.
    pub fn round_position(&self, round_id: &str) -> Result<(usize, RoundNumber), DomainError> {
        self.phases
            .iter()
            .enumerate()
            .find_map(|(index, phase)| {
                phase
                    .round_by_id(round_id)
                    .map(|round| (index, round.round_number))
            })
            .ok_or_else(|| DomainError::RoundNotFound(round_id.to_string()))
    }

    /// Builds the submission tracker for one research phase.
    ///
    /// The tracker only sees that phase's rounds. A watermark in another
    /// phase is reported as earlier or later than all of them; a watermark
    /// naming no known round leaves nothing completed.
    #[must_use]
    pub fn tracker<'a>(&'a self, phase: &'a ResearchPhase) -> RevisionSubmissionTracker<'a> {
        let watermark: Watermark<'a> = match self.completed_round_id.as_deref() {
            None => Watermark::Unset,
            Some(round_id) if phase.round_by_id(round_id).is_some() => Watermark::Round(round_id),
            Some(round_id) => {
                let marked: Option<usize> =
                    self.round_position(round_id).ok().map(|(index, _)| index);
                match (self.phase_position(phase), marked) {
                    (Some(index), Some(marked)) if marked < index => Watermark::EarlierPhase,
                    (Some(index), Some(marked)) if marked > index => Watermark::LaterPhase,
                    _ => Watermark::Unset,
                }
            }
        };
        RevisionSubmissionTracker::new(&phase.revision_rounds, &self.submissions, None)
            .with_watermark(watermark)
    }

    fn phase_position(&self, phase: &ResearchPhase) -> Option<usize> {
        self.phases.iter().position(|candidate| {
            std::ptr::eq(candidate, phase) || (phase.id.is_persisted() && candidate.id == phase.id)
        })
    }

    /// Builds the tracker for the phase a submission was made in.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionNotFound` or `RoundNotFound`.
    pub fn tracker_for_submission(
        &self,
        submission_id: &str,
    ) -> Result<RevisionSubmissionTracker<'_>, DomainError> {
        let submission = self
            .submissions
            .iter()
            .find(|submission| submission.id == submission_id)
            .ok_or_else(|| DomainError::SubmissionNotFound(submission_id.to_string()))?;
        let phase = self.phase_for_round(&submission.round_id)?;
        Ok(self.tracker(phase))
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "conference={},phases_count={},papers_count={},submissions_count={},completed_round={}",
            self.conference_id,
            self.phases.len(),
            self.papers.len(),
            self.submissions.len(),
            self.completed_round_id.as_deref().unwrap_or("none")
        ))
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
