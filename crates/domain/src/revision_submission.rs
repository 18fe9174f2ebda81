// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Revision submissions and their reviewer feedback exchange.
//!
//! ## Invariants
//!
//! - A submission references exactly one revision round by id
//! - Feedback items are kept ordered by `sort_order`
//! - Feedback and author responses are accepted only until the round's
//!   window closes; each round is gated independently
//! - The completed-round watermark is compared literally:
//!   `submission round >= watermark round` means completed
//! - Rounds are ordered by phase first, then round number, so a watermark
//!   in an earlier phase is behind every round of a later one

use crate::error::DomainError;
use crate::revision_round::{RevisionRound, RoundState};
use crate::validation::validate_round_set;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An author's reply to one feedback item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub responded_at: OffsetDateTime,
}

/// One piece of reviewer feedback on a revision submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: String,
    pub sort_order: u32,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub response: Option<AuthorResponse>,
}

/// An author's submission for one revision round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSubmission {
    pub id: String,
    pub paper_id: String,
    pub round_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    #[serde(default)]
    pub feedback: Vec<FeedbackItem>,
}

impl RevisionSubmission {
    /// Creates a submission without feedback.
    #[must_use]
    pub const fn new(
        id: String,
        paper_id: String,
        round_id: String,
        submitted_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            paper_id,
            round_id,
            submitted_at,
            feedback: Vec::new(),
        }
    }

    /// Appends a feedback item after the current last one.
    ///
    /// Gating is the caller's job; see [`RevisionSubmissionTracker::can_submit_feedback`].
    pub fn push_feedback(&mut self, id: String, message: String, at: OffsetDateTime) {
        let sort_order = self
            .feedback
            .iter()
            .map(|item| item.sort_order)
            .max()
            .map_or(1, |max| max + 1);
        self.feedback.push(FeedbackItem {
            id,
            sort_order,
            message,
            created_at: at,
            response: None,
        });
        self.feedback.sort_by_key(|item| item.sort_order);
    }

    /// Records (or replaces) the author's response to a feedback item.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FeedbackNotFound` if the item does not exist.
    pub fn respond(
        &mut self,
        feedback_id: &str,
        message: String,
        at: OffsetDateTime,
    ) -> Result<(), DomainError> {
        let submission_id = self.id.clone();
        let item = self
            .feedback
            .iter_mut()
            .find(|item| item.id == feedback_id)
            .ok_or_else(|| DomainError::FeedbackNotFound {
                submission_id,
                feedback_id: feedback_id.to_string(),
            })?;
        item.response = Some(AuthorResponse {
            message,
            responded_at: at,
        });
        Ok(())
    }
}

/// Whether feedback can be exchanged for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackGate {
    /// Nothing has been submitted for the round.
    Disabled,
    Pending,
    Open,
    Expired,
}

impl FeedbackGate {
    /// Returns the string representation of the gate.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Pending => "pending",
            Self::Open => "open",
            Self::Expired => "expired",
        }
    }
}

impl From<RoundState> for FeedbackGate {
    fn from(state: RoundState) -> Self {
        match state {
            RoundState::Pending => Self::Pending,
            RoundState::Open => Self::Open,
            RoundState::Expired => Self::Expired,
        }
    }
}

/// Where the completed-round watermark sits relative to the tracked rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watermark<'a> {
    /// No round is marked completed.
    Unset,
    /// One of the tracked rounds, by persisted id.
    Round(&'a str),
    /// A round of an earlier phase; every tracked round is at or beyond it.
    EarlierPhase,
    /// A round of a later phase; no tracked round reaches it.
    LaterPhase,
}

/// Read-only view answering round-progress questions about submissions.
#[derive(Debug, Clone, Copy)]
pub struct RevisionSubmissionTracker<'a> {
    rounds: &'a [RevisionRound],
    submissions: &'a [RevisionSubmission],
    watermark: Watermark<'a>,
}

impl<'a> RevisionSubmissionTracker<'a> {
    /// Creates a tracker.
    ///
    /// # Arguments
    ///
    /// * `rounds` - Every revision round of the conference
    /// * `submissions` - Every revision submission
    /// * `completed_round_id` - The round currently marked completed, if any
    #[must_use]
    pub const fn new(
        rounds: &'a [RevisionRound],
        submissions: &'a [RevisionSubmission],
        completed_round_id: Option<&'a str>,
    ) -> Self {
        Self {
            rounds,
            submissions,
            watermark: match completed_round_id {
                Some(round_id) => Watermark::Round(round_id),
                None => Watermark::Unset,
            },
        }
    }

    /// Replaces the watermark, for trackers over one phase of several.
    #[must_use]
    pub const fn with_watermark(mut self, watermark: Watermark<'a>) -> Self {
        self.watermark = watermark;
        self
    }

    /// Looks up a submission by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubmissionNotFound` if it does not exist.
    pub fn submission(&self, id: &str) -> Result<&'a RevisionSubmission, DomainError> {
        self.submissions
            .iter()
            .find(|submission| submission.id == id)
            .ok_or_else(|| DomainError::SubmissionNotFound(id.to_string()))
    }

    /// Looks up a round by its persisted id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RoundNotFound` if it does not exist.
    pub fn round(&self, round_id: &str) -> Result<&'a RevisionRound, DomainError> {
        self.rounds
            .iter()
            .find(|round| round.id.id().is_some_and(|id| id.as_str() == round_id))
            .ok_or_else(|| DomainError::RoundNotFound(round_id.to_string()))
    }

    /// Returns true if the submission belongs to the highest-numbered round
    /// among the same paper's submissions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateRound` if two rounds share a number,
    /// since the ordering would be ambiguous, or a lookup error.
    pub fn is_latest_submission(&self, id: &str) -> Result<bool, DomainError> {
        validate_round_set_numbers(self.rounds)?;

        let target = self.submission(id)?;
        let mut latest: Option<(u32, &str)> = None;
        for submission in self
            .submissions
            .iter()
            .filter(|submission| submission.paper_id == target.paper_id)
        {
            let number = self.round(&submission.round_id)?.round_number.value();
            if latest.is_none_or(|(best, _)| number > best) {
                latest = Some((number, submission.id.as_str()));
            }
        }

        Ok(latest.is_some_and(|(_, latest_id)| latest_id == id))
    }

    /// Returns true if the submission's round is at or beyond the
    /// conference's completed-round watermark.
    ///
    /// Without a watermark nothing is completed. A watermark in an earlier
    /// phase completes every round here; one in a later phase completes none.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the submission or a round is missing.
    pub fn is_submission_completed(&self, id: &str) -> Result<bool, DomainError> {
        if self.watermark == Watermark::Unset {
            return Ok(false);
        }
        let submission = self.submission(id)?;
        let round = self.round(&submission.round_id)?;
        match self.watermark {
            Watermark::Unset | Watermark::LaterPhase => Ok(false),
            Watermark::EarlierPhase => Ok(true),
            Watermark::Round(completed_round_id) => {
                let marked = self.round(completed_round_id)?;
                Ok(round.round_number >= marked.round_number)
            }
        }
    }

    /// Returns true while feedback may still be attached to the submission.
    ///
    /// Feedback stays open until the submission's round window closes.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the submission or its round is missing.
    pub fn can_submit_feedback(
        &self,
        id: &str,
        now: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        let submission = self.submission(id)?;
        let round = self.round(&submission.round_id)?;
        Ok(now <= round.window.end())
    }

    /// Returns the feedback gate of a round at `now`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RoundNotFound` if the round is missing.
    pub fn feedback_gate(
        &self,
        round_id: &str,
        now: OffsetDateTime,
    ) -> Result<FeedbackGate, DomainError> {
        let round = self.round(round_id)?;
        let has_submission = self
            .submissions
            .iter()
            .any(|submission| submission.round_id == round_id);
        if !has_submission {
            return Ok(FeedbackGate::Disabled);
        }
        Ok(round.state_at(now).into())
    }
}

fn validate_round_set_numbers(rounds: &[RevisionRound]) -> Result<(), DomainError> {
    match validate_round_set(rounds) {
        Err(err @ DomainError::DuplicateRound { .. }) => Err(err),
        // Overlap does not make ordering ambiguous
        _ => Ok(()),
    }
}
