// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain-text rendering of conference timelines.

use conftrack::{State, submission_progress};
use conftrack_domain::{
    ArtifactKind, PhaseGraphVariant, PhaseWindow, PhaseWindowKind, ResearchPhase,
    RevisionSubmissionTracker, validate_phase, validate_phase_sequence,
};
use conftrack_persistence::ReconcileReport;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const DECISIONS: [ArtifactKind; 4] = [
    ArtifactKind::Abstract,
    ArtifactKind::FullPaper,
    ArtifactKind::RevisionPaper,
    ArtifactKind::CameraReady,
];

/// Where a configured window stands relative to an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Undated,
    /// Dated, but not a valid range.
    Invalid,
    Upcoming,
    Open,
    Closed,
}

impl WindowState {
    pub fn at(window: &PhaseWindow, now: OffsetDateTime) -> Self {
        if window.is_undated() {
            return Self::Undated;
        }
        match window.as_time_window() {
            None => Self::Invalid,
            Some(range) if range.contains(now) => Self::Open,
            Some(range) if now < range.start() => Self::Upcoming,
            Some(_) => Self::Closed,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Undated => "undated",
            Self::Invalid => "invalid",
            Self::Upcoming => "upcoming",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

pub fn format_instant(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}

fn format_bound(at: Option<OffsetDateTime>) -> String {
    at.map_or_else(|| String::from("-"), format_instant)
}

fn phase_label(phase: &ResearchPhase) -> String {
    phase.id.id().map_or_else(
        || format!("'{}' (new)", phase.name),
        |id| format!("'{}' ({id})", phase.name),
    )
}

/// Validates every phase, then the sequence.
///
/// Returns the report lines and the number of problems found.
pub fn validation_lines(state: &State, now: OffsetDateTime) -> (Vec<String>, usize) {
    let mut lines: Vec<String> = Vec::new();
    let mut problems: usize = 0;

    for phase in &state.phases {
        match validate_phase(phase) {
            Ok(()) => lines.push(format!("phase {}: ok", phase_label(phase))),
            Err(err) => {
                problems += 1;
                lines.push(format!("phase {}: {err}", phase_label(phase)));
            }
        }

        let open: Vec<&str> = DECISIONS
            .iter()
            .filter(|artifact| {
                WindowState::at(phase.window(artifact.decision_window()), now) == WindowState::Open
            })
            .map(ArtifactKind::as_str)
            .collect();
        if !open.is_empty() {
            lines.push(format!("  decisions open: {}", open.join(", ")));
        }
    }

    if problems == 0 {
        match validate_phase_sequence(&state.phases) {
            Ok(()) => lines.push(format!("sequence of {} phase(s): ok", state.phases.len())),
            Err(err) => {
                problems += 1;
                lines.push(format!("sequence: {err}"));
            }
        }
    }
    (lines, problems)
}

/// Lists every window, round and submission of the conference at `now`.
pub fn timeline_lines(state: &State, now: OffsetDateTime) -> Vec<String> {
    let mut lines: Vec<String> = vec![format!(
        "conference {} at {}",
        state.conference_id,
        format_instant(now)
    )];

    for phase in &state.phases {
        lines.push(format!("phase {} [{}]", phase_label(phase), phase_variant(phase)));
        for kind in PhaseWindowKind::SEQUENCE
            .into_iter()
            .chain([PhaseWindowKind::CameraReadyDecideStatus])
        {
            let window: &PhaseWindow = phase.window(kind);
            lines.push(format!(
                "  {:<29} {} .. {} {}",
                kind.as_str(),
                format_bound(window.start()),
                format_bound(window.end()),
                WindowState::at(window, now).as_str()
            ));
        }

        let tracker: RevisionSubmissionTracker<'_> = state.tracker(phase);
        for round in &phase.revision_rounds {
            let gate: &str = round
                .id
                .id()
                .and_then(|id| tracker.feedback_gate(id.as_str(), now).ok())
                .map_or("disabled", |gate| gate.as_str());
            lines.push(format!(
                "  round {} {} .. {} {} (feedback {gate})",
                round.round_number.value(),
                format_instant(round.window.start()),
                format_instant(round.window.end()),
                round.state_at(now).as_str()
            ));
        }
    }

    for submission in &state.submissions {
        let progress: String = match submission_progress(state, &submission.id, now) {
            Ok(progress) => format!(
                "latest={} completed={} feedback_open={}",
                progress.is_latest, progress.is_completed, progress.feedback_open
            ),
            Err(err) => format!("error: {err}"),
        };
        lines.push(format!(
            "submission {} paper={} round={} {progress}",
            submission.id, submission.paper_id, submission.round_id
        ));
    }
    lines
}

const fn phase_variant(phase: &ResearchPhase) -> &'static str {
    match phase.variant {
        PhaseGraphVariant::Full => "full",
        PhaseGraphVariant::Standard => "standard",
    }
}

/// Summarizes a reconciliation.
pub fn report_lines(report: &ReconcileReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .operations
        .iter()
        .map(|operation| format!("ok     {operation}"))
        .collect();
    lines.extend(
        report
            .failures
            .iter()
            .map(|failure| format!("failed {failure}")),
    );
    if lines.is_empty() {
        lines.push(String::from("no changes"));
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use conftrack_domain::{Identity, RevisionRound, RoundNumber, TimeWindow};
    use time::macros::datetime;

    fn create_phase() -> ResearchPhase {
        let mut phase = ResearchPhase::new("Main track", PhaseGraphVariant::Full);
        phase.id = Identity::persisted("phase-1");
        let mut cursor: OffsetDateTime = datetime!(2026-01-01 0:00 UTC);
        for (kind, days) in PhaseWindowKind::SEQUENCE
            .into_iter()
            .zip([9, 5, 17, 14, 10, 35, 9, 15, 15])
        {
            let window = PhaseWindow::with_start(cursor, days).unwrap();
            cursor = window.end().unwrap();
            *phase.window_mut(kind) = window;
        }
        phase.revision_rounds = vec![RevisionRound::with_id(
            "round-1",
            RoundNumber::new(1).unwrap(),
            TimeWindow::new(datetime!(2026-03-01 0:00 UTC), datetime!(2026-03-10 0:00 UTC))
                .unwrap(),
        )];
        phase
    }

    fn create_state() -> State {
        let mut state = State::new(String::from("conf-2026"));
        state.phases.push(create_phase());
        state
    }

    #[test]
    fn test_window_state() {
        let window = PhaseWindow::dated(
            datetime!(2026-03-01 0:00 UTC),
            datetime!(2026-03-10 0:00 UTC),
        );

        assert_eq!(
            WindowState::at(&window, datetime!(2026-02-01 0:00 UTC)),
            WindowState::Upcoming
        );
        assert_eq!(
            WindowState::at(&window, datetime!(2026-03-10 0:00 UTC)),
            WindowState::Open
        );
        assert_eq!(
            WindowState::at(&window, datetime!(2026-03-11 0:00 UTC)),
            WindowState::Closed
        );
        assert_eq!(
            WindowState::at(&PhaseWindow::undated(), datetime!(2026-03-11 0:00 UTC)),
            WindowState::Undated
        );
    }

    #[test]
    fn test_valid_state_has_no_problems() {
        let (lines, problems) = validation_lines(&create_state(), datetime!(2026-02-20 0:00 UTC));

        assert_eq!(problems, 0);
        assert_eq!(lines[0], "phase 'Main track' (phase-1): ok");
        assert_eq!(lines[1], "  decisions open: full_paper");
        assert_eq!(lines.last().unwrap(), "sequence of 1 phase(s): ok");
    }

    #[test]
    fn test_out_of_order_phase_is_a_problem() {
        let mut state = create_state();
        state.phases[0]
            .window_mut(PhaseWindowKind::FullPaper)
            .set_start(datetime!(2026-01-09 0:00 UTC))
            .unwrap();

        let (lines, problems) = validation_lines(&state, datetime!(2026-01-01 0:00 UTC));

        assert_eq!(problems, 1);
        assert!(lines[0].starts_with("phase 'Main track' (phase-1): "));
        assert!(!lines.iter().any(|line| line.starts_with("sequence")));
    }

    #[test]
    fn test_timeline_lists_windows_and_rounds() {
        let lines = timeline_lines(&create_state(), datetime!(2026-03-05 0:00 UTC));

        assert_eq!(lines[0], "conference conf-2026 at 2026-03-05T00:00:00Z");
        assert!(lines.iter().any(|line| line.trim_start().starts_with("revise")
            && line.ends_with("open")));
        assert!(
            lines
                .iter()
                .any(|line| line.contains("round 1") && line.ends_with("open (feedback disabled)"))
        );
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(
            report_lines(&ReconcileReport::default()),
            vec![String::from("no changes")]
        );
    }
}
