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

mod apply;
mod command;
mod edit;
mod error;
mod state;

#[cfg(test)]
mod tests;

use conftrack_domain::{DomainError, RevisionSubmissionTracker};
use time::OffsetDateTime;

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use edit::{ConferenceDraft, EditMode, EditSession};
pub use error::CoreError;
pub use state::{Paper, State, TransitionResult};

/// Where a revision submission stands at a given instant.
///
/// This is a read-only query that does not create audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionProgress {
    /// Belongs to the highest round the paper submitted to.
    pub is_latest: bool,
    /// At or beyond the completed-round watermark.
    pub is_completed: bool,
    /// Feedback may still be exchanged.
    pub feedback_open: bool,
}

/// Reports the progress of one revision submission.
///
/// # Arguments
///
/// * `state` - The conference state
/// * `submission_id` - The submission to report on
/// * `now` - The instant feedback gating is evaluated at
///
/// # Errors
///
/// Returns a lookup error, or `DomainError::DuplicateRound` if the
/// submission's phase numbers two rounds the same.
pub fn submission_progress(
    state: &State,
    submission_id: &str,
    now: OffsetDateTime,
) -> Result<SubmissionProgress, DomainError> {
    let tracker: RevisionSubmissionTracker<'_> = state.tracker_for_submission(submission_id)?;
    Ok(SubmissionProgress {
        is_latest: tracker.is_latest_submission(submission_id)?,
        is_completed: tracker.is_submission_completed(submission_id)?,
        feedback_open: tracker.can_submit_feedback(submission_id, now)?,
    })
}
