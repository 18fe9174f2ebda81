// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    PhaseGraphVariant, PhaseWindow, PhaseWindowKind, ResearchPhase, RevisionRound, RoundNumber,
    TimeWindow,
};
use time::OffsetDateTime;

/// Days allotted to each sequential window, in sequence order.
const DURATIONS: [(PhaseWindowKind, u16); 9] = [
    (PhaseWindowKind::Registration, 9),
    (PhaseWindowKind::AbstractDecideStatus, 5),
    (PhaseWindowKind::FullPaper, 17),
    (PhaseWindowKind::Review, 14),
    (PhaseWindowKind::FullPaperDecideStatus, 10),
    (PhaseWindowKind::Revise, 35),
    (PhaseWindowKind::RevisionPaperDecideStatus, 9),
    (PhaseWindowKind::CameraReady, 15),
    (PhaseWindowKind::AuthorPayment, 15),
];

/// Builds a valid full phase whose windows are chained back to back.
///
/// Starting 2026-01-01 this gives `revise = [2026-02-25, 2026-04-01]`
/// and `author_payment = [2026-04-25, 2026-05-10]`.
pub fn create_valid_phase(start: OffsetDateTime) -> ResearchPhase {
    let mut phase = ResearchPhase::new("Main track", PhaseGraphVariant::Full);
    let mut cursor = start;
    for (kind, days) in DURATIONS {
        let window = PhaseWindow::with_start(cursor, days).unwrap();
        cursor = window.end().unwrap();
        *phase.window_mut(kind) = window;
    }
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

pub fn set_window(
    phase: &mut ResearchPhase,
    kind: PhaseWindowKind,
    start: OffsetDateTime,
    end: OffsetDateTime,
) {
    *phase.window_mut(kind) = PhaseWindow::dated(start, end);
}
