// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ArtifactKind, DecisionStatus, DomainError, PhaseWindowKind};

#[test]
fn test_out_of_order_names_both_windows() {
    let err = DomainError::OutOfOrder {
        predecessor: PhaseWindowKind::AbstractDecideStatus,
        successor: PhaseWindowKind::FullPaper,
    };
    assert_eq!(
        err.to_string(),
        "'full_paper' must not start before 'abstract_decide_status' ends"
    );
}

#[test]
fn test_round_errors() {
    assert_eq!(
        DomainError::DuplicateRound { round_number: 1 }.to_string(),
        "Revision round 1 is defined more than once"
    );
    assert_eq!(
        DomainError::RoundOverlap {
            first: 1,
            second: 2
        }
        .to_string(),
        "Revision rounds 1 and 2 overlap"
    );
    assert_eq!(
        DomainError::InvalidRoundNumber(0).to_string(),
        "Invalid round number: 0. Must be greater than 0"
    );
}

#[test]
fn test_already_decided() {
    let err = DomainError::AlreadyDecided {
        artifact: ArtifactKind::CameraReady,
        status: DecisionStatus::Rejected,
    };
    assert_eq!(
        err.to_string(),
        "camera_ready has already been decided as rejected"
    );
}

#[test]
fn test_missing_field() {
    let err = DomainError::MissingField {
        field: String::from("revise.end"),
    };
    assert_eq!(err.to_string(), "Required field 'revise.end' is empty");
}

#[test]
fn test_phase_overlap() {
    let err = DomainError::PhaseOverlap {
        primary: 0,
        secondary: 1,
    };
    assert_eq!(
        err.to_string(),
        "Phase 1 must start after phase 0 has finished"
    );
}

#[test]
fn test_watermark_regression() {
    let err = DomainError::WatermarkRegression {
        current: 3,
        requested: 2,
    };
    assert_eq!(
        err.to_string(),
        "Cannot mark round 2 completed: round 3 is already completed"
    );
}

#[test]
fn test_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::PaperNotFound(String::from("p1")));
    assert_eq!(err.to_string(), "Paper 'p1' not found");
}
