// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use conftrack_domain::{ArtifactKind, Decision, ResearchPhase};

/// A command represents organizer, reviewer or author intent as data only.
///
/// Commands are the only way to request changes to a conference's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Accept or reject one artifact of a paper.
    DecideArtifact {
        /// The paper being decided on.
        paper_id: String,
        /// Which artifact of the paper.
        artifact: ArtifactKind,
        /// The requested outcome.
        decision: Decision,
    },
    /// Record an author's revision for a round.
    SubmitRevision {
        /// Identifier for the new submission.
        submission_id: String,
        /// The paper being revised.
        paper_id: String,
        /// The revision round submitted to.
        round_id: String,
    },
    /// Attach reviewer feedback to a revision submission.
    AddFeedback {
        submission_id: String,
        /// Identifier for the new feedback item.
        feedback_id: String,
        message: String,
    },
    /// Record the author's reply to a feedback item.
    RespondToFeedback {
        submission_id: String,
        feedback_id: String,
        response: String,
    },
    /// Move the conference's completed-round watermark.
    MarkRoundCompleted {
        /// The round now considered completed.
        round_id: String,
    },
    /// Replace the research phases with a validated set.
    ReplacePhases {
        /// The new phases, primary edition first.
        phases: Vec<ResearchPhase>,
    },
}

impl Command {
    /// The action name recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DecideArtifact { .. } => "DecideArtifact",
            Self::SubmitRevision { .. } => "SubmitRevision",
            Self::AddFeedback { .. } => "AddFeedback",
            Self::RespondToFeedback { .. } => "RespondToFeedback",
            Self::MarkRoundCompleted { .. } => "MarkRoundCompleted",
            Self::ReplacePhases { .. } => "ReplacePhases",
        }
    }
}
