// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Paper, State, TransitionResult};
use conftrack_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use conftrack_domain::{
    Clock, DomainError, RevisionSubmission, RoundState, decide_status, validate_phase_sequence,
};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Applies a command to the current state, producing a new state and audit event.
///
/// The clock is read once; every window check of the command uses that
/// reading, and it is recorded on the audit event.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `clock` - The source of the current instant
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - A referenced paper, phase, round, submission or feedback item is missing
/// - The command's gating window is not open at the clock reading
/// - The artifact was already decided
/// - Replacement phases do not validate
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &State,
    command: Command,
    actor: Actor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<TransitionResult, CoreError> {
    let now: OffsetDateTime = clock.now();
    let name: &'static str = command.name();
    debug!(command = name, conference_id = %state.conference_id, %now, "Applying command");

    let (new_state, before, after, details) = match command {
        Command::DecideArtifact {
            paper_id,
            artifact,
            decision,
        } => {
            let paper: &Paper = state.paper(&paper_id)?;
            let phase = state.phase(&paper.phase_id)?;
            let current = paper.statuses.get(artifact);
            let status = decide_status(artifact, current, decision, phase, now)?;

            let mut new_state: State = state.clone();
            let mut updated: Paper = paper.clone();
            updated.statuses.set(artifact, status);
            let before: StateSnapshot = paper.to_snapshot();
            let after: StateSnapshot = updated.to_snapshot();
            replace_paper(&mut new_state, updated);

            let details = format!(
                "Decided {} of paper '{paper_id}' as {}",
                artifact.as_str(),
                status.as_str()
            );
            (new_state, before, after, details)
        }
        Command::SubmitRevision {
            submission_id,
            paper_id,
            round_id,
        } => {
            let paper: &Paper = state.paper(&paper_id)?;
            let phase = state.phase(&paper.phase_id)?;
            let round = phase
                .round_by_id(&round_id)
                .ok_or_else(|| DomainError::RoundNotFound(round_id.clone()))?;

            if round.state_at(now) != RoundState::Open {
                return Err(DomainError::OutOfWindow {
                    action: format!("submit revision round {}", round.round_number.value()),
                    at: now,
                }
                .into());
            }

            let duplicate = state.submissions.iter().any(|submission| {
                submission.paper_id == paper_id && submission.round_id == round_id
            });
            if duplicate {
                return Err(DomainError::DuplicateSubmission { paper_id, round_id }.into());
            }

            let details = format!(
                "Paper '{paper_id}' submitted revision '{submission_id}' for round {}",
                round.round_number.value()
            );
            let mut new_state: State = state.clone();
            new_state.submissions.push(RevisionSubmission::new(
                submission_id,
                paper_id,
                round_id,
                now,
            ));
            let after: StateSnapshot = new_state.to_snapshot();
            (new_state, state.to_snapshot(), after, details)
        }
        Command::AddFeedback {
            submission_id,
            feedback_id,
            message,
        } => {
            ensure_feedback_open(state, &submission_id, "add feedback", now)?;

            let mut new_state: State = state.clone();
            let submission = submission_mut(&mut new_state, &submission_id)?;
            let before: StateSnapshot = submission_snapshot(submission);
            submission.push_feedback(feedback_id.clone(), message, now);
            let after: StateSnapshot = submission_snapshot(submission);

            let details =
                format!("Added feedback '{feedback_id}' to submission '{submission_id}'");
            (new_state, before, after, details)
        }
        Command::RespondToFeedback {
            submission_id,
            feedback_id,
            response,
        } => {
            ensure_feedback_open(state, &submission_id, "respond to feedback", now)?;

            let mut new_state: State = state.clone();
            let submission = submission_mut(&mut new_state, &submission_id)?;
            let before: StateSnapshot = submission_snapshot(submission);
            submission.respond(&feedback_id, response, now)?;
            let after: StateSnapshot = submission_snapshot(submission);

            let details =
                format!("Responded to feedback '{feedback_id}' on submission '{submission_id}'");
            (new_state, before, after, details)
        }
        Command::MarkRoundCompleted { round_id } => {
            let (requested_phase, requested) = state.round_position(&round_id)?;

            if let Some(current_id) = state.completed_round_id.as_deref() {
                let (current_phase, current) = state.round_position(current_id)?;
                if (requested_phase, requested) < (current_phase, current) {
                    return Err(DomainError::WatermarkRegression {
                        current: current.value(),
                        requested: requested.value(),
                    }
                    .into());
                }
            }

            let mut new_state: State = state.clone();
            new_state.completed_round_id = Some(round_id.clone());
            let details = format!(
                "Marked round {} ('{round_id}') completed",
                requested.value()
            );
            let after: StateSnapshot = new_state.to_snapshot();
            (new_state, state.to_snapshot(), after, details)
        }
        Command::ReplacePhases { phases } => {
            validate_phase_sequence(&phases)?;

            let mut new_state: State = state.clone();
            new_state.phases = phases;
            let details = format!("Replaced research phases ({} total)", new_state.phases.len());
            let after: StateSnapshot = new_state.to_snapshot();
            (new_state, state.to_snapshot(), after, details)
        }
    };

    info!(command = name, conference_id = %state.conference_id, "{details}");

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(name), Some(details)),
        before,
        after,
        state.conference_id.clone(),
        now,
    );

    Ok(TransitionResult {
        new_state,
        audit_event,
    })
}

fn ensure_feedback_open(
    state: &State,
    submission_id: &str,
    action: &str,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    let tracker = state.tracker_for_submission(submission_id)?;
    if tracker.can_submit_feedback(submission_id, now)? {
        Ok(())
    } else {
        Err(DomainError::OutOfWindow {
            action: action.to_string(),
            at: now,
        })
    }
}

fn submission_mut<'a>(
    state: &'a mut State,
    submission_id: &str,
) -> Result<&'a mut RevisionSubmission, DomainError> {
    state
        .submissions
        .iter_mut()
        .find(|submission| submission.id == submission_id)
        .ok_or_else(|| DomainError::SubmissionNotFound(submission_id.to_string()))
}

fn replace_paper(state: &mut State, paper: Paper) {
    if let Some(slot) = state
        .papers
        .iter_mut()
        .find(|existing| existing.paper_id == paper.paper_id)
    {
        *slot = paper;
    }
}

fn submission_snapshot(submission: &RevisionSubmission) -> StateSnapshot {
    let responses: usize = submission
        .feedback
        .iter()
        .filter(|item| item.response.is_some())
        .count();
    StateSnapshot::new(format!(
        "submission={},feedback_count={},responses_count={responses}",
        submission.id,
        submission.feedback.len()
    ))
}
