// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Paper, State};
use conftrack_audit::{Actor, Cause};
use conftrack_domain::{
    FixedClock, Identity, PhaseGraphVariant, PhaseWindow, PhaseWindowKind, ResearchPhase,
    RevisionRound, RoundNumber, TimeWindow,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("chair-1"), String::from("head_reviewer"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Review console"))
}

pub const fn clock_at(now: OffsetDateTime) -> FixedClock {
    FixedClock::new(now)
}

/// A persisted full phase starting 2026-01-01.
///
/// Windows: full paper decision `[Feb 15, Feb 25]`, revise `[Feb 25, Apr 1]`,
/// rounds `round-1 [Mar 1, Mar 10]` and `round-2 [Mar 15, Mar 25]`.
pub fn create_test_phase() -> ResearchPhase {
    let mut phase = ResearchPhase::new("Main track", PhaseGraphVariant::Full);
    phase.id = Identity::persisted("phase-1");

    let mut cursor: OffsetDateTime = datetime!(2026-01-01 0:00 UTC);
    for (kind, days) in [
        (PhaseWindowKind::Registration, 9),
        (PhaseWindowKind::AbstractDecideStatus, 5),
        (PhaseWindowKind::FullPaper, 17),
        (PhaseWindowKind::Review, 14),
        (PhaseWindowKind::FullPaperDecideStatus, 10),
        (PhaseWindowKind::Revise, 35),
        (PhaseWindowKind::RevisionPaperDecideStatus, 9),
        (PhaseWindowKind::CameraReady, 15),
        (PhaseWindowKind::AuthorPayment, 15),
    ] {
        let window = PhaseWindow::with_start(cursor, days).unwrap();
        cursor = window.end().unwrap();
        *phase.window_mut(kind) = window;
    }

    phase.revision_rounds = vec![
        create_round(
            "round-1",
            1,
            datetime!(2026-03-01 0:00 UTC),
            datetime!(2026-03-10 0:00 UTC),
        ),
        create_round(
            "round-2",
            2,
            datetime!(2026-03-15 0:00 UTC),
            datetime!(2026-03-25 0:00 UTC),
        ),
    ];
    phase
}

pub fn create_round(
    id: &str,
    number: u32,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> RevisionRound {
    RevisionRound::with_id(
        id,
        RoundNumber::new(number).unwrap(),
        TimeWindow::new(start, end).unwrap(),
    )
}

/// A conference with one phase and papers `p1` and `p2`.
pub fn create_test_state() -> State {
    let mut state = State::new(String::from("conf-2026"));
    state.phases.push(create_test_phase());
    state.papers.push(Paper::new("p1", "phase-1"));
    state.papers.push(Paper::new("p2", "phase-1"));
    state
}
