// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_round, create_valid_phase, set_window};
use crate::{
    DomainError, PhaseGraphVariant, PhaseWindow, PhaseWindowKind, ResearchPhase, validate_phase,
    validate_phase_sequence,
};
use time::Duration;
use time::macros::datetime;

#[test]
fn test_valid_phase_passes() {
    let phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    assert_eq!(validate_phase(&phase), Ok(()));
}

#[test]
fn test_registration_overlapping_full_paper_is_out_of_order() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    set_window(
        &mut phase,
        PhaseWindowKind::Registration,
        datetime!(2026-01-01 0:00 UTC),
        datetime!(2026-01-10 0:00 UTC),
    );
    phase
        .window_mut(PhaseWindowKind::FullPaper)
        .set_start(datetime!(2026-01-09 0:00 UTC))
        .unwrap();

    let result: Result<(), DomainError> = validate_phase(&phase);
    assert!(matches!(
        result,
        Err(DomainError::OutOfOrder {
            successor: PhaseWindowKind::FullPaper,
            ..
        })
    ));
}

#[test]
fn test_every_adjacent_pair_is_checked() {
    let base: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));

    for pair in PhaseWindowKind::SEQUENCE.windows(2) {
        let (predecessor, successor) = (pair[0], pair[1]);
        let mut phase: ResearchPhase = base.clone();
        let predecessor_end = phase.window(predecessor).end().unwrap();
        let successor_end = phase.window(successor).end().unwrap();
        set_window(
            &mut phase,
            successor,
            predecessor_end - Duration::hours(1),
            successor_end,
        );

        assert_eq!(
            validate_phase(&phase),
            Err(DomainError::OutOfOrder {
                predecessor,
                successor,
            }),
            "pair {predecessor} -> {successor}"
        );
    }
}

#[test]
fn test_touching_windows_are_in_order() {
    let phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    // Windows are chained end == start by construction
    assert_eq!(
        phase.registration.end(),
        phase.abstract_decide_status.start()
    );
    assert!(validate_phase(&phase).is_ok());
}

#[test]
fn test_zero_length_window_is_invalid_range() {
    let base: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));

    for kind in PhaseWindowKind::SEQUENCE {
        let mut phase: ResearchPhase = base.clone();
        let start = phase.window(kind).start().unwrap();
        set_window(&mut phase, kind, start, start);

        assert!(
            matches!(
                validate_phase(&phase),
                Err(DomainError::InvalidRange { ref window, .. }) if window == kind.as_str()
            ),
            "window {kind}"
        );
    }
}

#[test]
fn test_inverted_window_is_invalid_range() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    set_window(
        &mut phase,
        PhaseWindowKind::Review,
        datetime!(2026-02-15 0:00 UTC),
        datetime!(2026-02-01 0:00 UTC),
    );
    assert!(matches!(
        validate_phase(&phase),
        Err(DomainError::InvalidRange { .. })
    ));
}

#[test]
fn test_missing_field_is_reported_first() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    // Out of order as well, but the missing field wins
    set_window(
        &mut phase,
        PhaseWindowKind::Review,
        datetime!(2026-01-02 0:00 UTC),
        datetime!(2026-01-03 0:00 UTC),
    );
    phase.author_payment = PhaseWindow::undated();

    assert_eq!(
        validate_phase(&phase),
        Err(DomainError::MissingField {
            field: String::from("author_payment.start"),
        })
    );
}

#[test]
fn test_standard_variant_does_not_require_author_payment() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    phase.variant = PhaseGraphVariant::Standard;
    phase.author_payment = PhaseWindow::undated();
    assert_eq!(validate_phase(&phase), Ok(()));
}

#[test]
fn test_zero_length_camera_ready_decision_is_invalid_range() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    phase.camera_ready_decide_status =
        PhaseWindow::with_start(datetime!(2026-04-25 0:00 UTC), 0).unwrap();

    assert!(matches!(
        validate_phase(&phase),
        Err(DomainError::InvalidRange { ref window, .. }) if window == "camera_ready_decide_status"
    ));
}

#[test]
fn test_round_outside_revise_is_out_of_bounds() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    phase.revision_rounds.push(create_round(
        "r1",
        1,
        datetime!(2026-03-20 0:00 UTC),
        datetime!(2026-04-05 0:00 UTC),
    ));

    assert_eq!(
        validate_phase(&phase),
        Err(DomainError::RoundOutOfBounds { round_number: 1 })
    );
}

#[test]
fn test_duplicate_round_is_reported_before_overlap() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    phase.revision_rounds.push(create_round(
        "r1",
        1,
        datetime!(2026-03-01 0:00 UTC),
        datetime!(2026-03-10 0:00 UTC),
    ));
    phase.revision_rounds.push(create_round(
        "r2",
        1,
        datetime!(2026-03-05 0:00 UTC),
        datetime!(2026-03-08 0:00 UTC),
    ));

    assert_eq!(
        validate_phase(&phase),
        Err(DomainError::DuplicateRound { round_number: 1 })
    );
}

#[test]
fn test_overlapping_rounds() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    phase.revision_rounds.push(create_round(
        "r1",
        1,
        datetime!(2026-03-01 0:00 UTC),
        datetime!(2026-03-10 0:00 UTC),
    ));
    phase.revision_rounds.push(create_round(
        "r2",
        2,
        datetime!(2026-03-10 0:00 UTC),
        datetime!(2026-03-20 0:00 UTC),
    ));

    assert_eq!(
        validate_phase(&phase),
        Err(DomainError::RoundOverlap {
            first: 1,
            second: 2
        })
    );
}

#[test]
fn test_disjoint_rounds_pass() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    phase.revision_rounds.push(create_round(
        "r1",
        1,
        datetime!(2026-03-01 0:00 UTC),
        datetime!(2026-03-10 0:00 UTC),
    ));
    phase.revision_rounds.push(create_round(
        "r2",
        2,
        datetime!(2026-03-11 0:00 UTC),
        datetime!(2026-04-01 0:00 UTC),
    ));

    assert_eq!(validate_phase(&phase), Ok(()));
}

#[test]
fn test_bounds_are_checked_before_duplicates() {
    let mut phase: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    phase.revision_rounds.push(create_round(
        "r1",
        1,
        datetime!(2026-03-01 0:00 UTC),
        datetime!(2026-03-10 0:00 UTC),
    ));
    phase.revision_rounds.push(create_round(
        "r2",
        1,
        datetime!(2026-05-01 0:00 UTC),
        datetime!(2026-05-08 0:00 UTC),
    ));

    assert_eq!(
        validate_phase(&phase),
        Err(DomainError::RoundOutOfBounds { round_number: 1 })
    );
}

#[test]
fn test_phase_sequence_requires_gap() {
    let primary: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    // Primary author payment ends 2026-05-10
    let touching: ResearchPhase = create_valid_phase(datetime!(2026-05-10 0:00 UTC));
    let later: ResearchPhase = create_valid_phase(datetime!(2026-05-11 0:00 UTC));

    assert_eq!(
        validate_phase_sequence(&[primary.clone(), touching]),
        Err(DomainError::PhaseOverlap {
            primary: 0,
            secondary: 1
        })
    );
    assert_eq!(validate_phase_sequence(&[primary, later]), Ok(()));
}

#[test]
fn test_phase_sequence_reports_invalid_phase_first() {
    let primary: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    let mut secondary: ResearchPhase = create_valid_phase(datetime!(2027-01-01 0:00 UTC));
    secondary.review = PhaseWindow::undated();

    assert_eq!(
        validate_phase_sequence(&[primary, secondary]),
        Err(DomainError::MissingField {
            field: String::from("review.start"),
        })
    );
}

#[test]
fn test_serialized_phase_keeps_its_verdict() {
    let mut valid: ResearchPhase = create_valid_phase(datetime!(2026-01-01 0:00 UTC));
    valid.revision_rounds.push(create_round(
        "r1",
        1,
        datetime!(2026-03-01 0:00 UTC),
        datetime!(2026-03-10 0:00 UTC),
    ));
    let mut invalid: ResearchPhase = valid.clone();
    invalid
        .window_mut(PhaseWindowKind::FullPaper)
        .set_start(datetime!(2026-01-09 0:00 UTC))
        .unwrap();

    for phase in [valid, invalid] {
        let json: String = serde_json::to_string(&phase).unwrap();
        let restored: ResearchPhase = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, phase);
        assert_eq!(validate_phase(&restored), validate_phase(&phase));
    }
}
