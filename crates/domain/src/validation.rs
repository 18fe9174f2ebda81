// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::phase::{PhaseWindowKind, ResearchPhase};
use crate::revision_round::RevisionRound;
use crate::time_window::TimeWindow;
use std::collections::HashSet;
use time::OffsetDateTime;

/// Validates a research phase.
///
/// Checks run in a fixed order and the first failure is returned:
///
/// 1. Every required window is fully dated
/// 2. Every sequential window has `start < end` and does not start
///    before its predecessor ends
/// 3. Every revision round lies inside the revise window
/// 4. Round numbers are unique, then round windows do not overlap
///
/// # Arguments
///
/// * `phase` - The phase to validate
///
/// # Returns
///
/// * `Ok(())` if the phase is valid
/// * `Err(DomainError)` describing the first violated rule
///
/// # Errors
///
/// Returns `MissingField`, `InvalidRange`, `OutOfOrder`,
/// `RoundOutOfBounds`, `DuplicateRound` or `RoundOverlap`.
pub fn validate_phase(phase: &ResearchPhase) -> Result<(), DomainError> {
    validate_required_fields(phase)?;
    validate_sequence(phase)?;
    validate_rounds(phase)
}

fn validate_required_fields(phase: &ResearchPhase) -> Result<(), DomainError> {
    for kind in PhaseWindowKind::SEQUENCE {
        let window = phase.window(kind);
        if !phase.variant.requires(kind) && window.is_undated() {
            continue;
        }
        if window.start().is_none() {
            return Err(missing(kind, "start"));
        }
        if window.end().is_none() {
            return Err(missing(kind, "end"));
        }
    }

    // Optional, but never half configured
    let decision = phase.window(PhaseWindowKind::CameraReadyDecideStatus);
    if !decision.is_undated() {
        if decision.start().is_none() {
            return Err(missing(PhaseWindowKind::CameraReadyDecideStatus, "start"));
        }
        if decision.end().is_none() {
            return Err(missing(PhaseWindowKind::CameraReadyDecideStatus, "end"));
        }
    }

    Ok(())
}

fn validate_sequence(phase: &ResearchPhase) -> Result<(), DomainError> {
    let mut previous: Option<(PhaseWindowKind, OffsetDateTime)> = None;

    for kind in PhaseWindowKind::SEQUENCE {
        let window = phase.window(kind);
        let (Some(start), Some(end)) = (window.start(), window.end()) else {
            // Only an optional, fully undated window gets here
            continue;
        };

        check_range(kind, start, end)?;

        if let Some((predecessor, predecessor_end)) = previous {
            if predecessor_end > start {
                return Err(DomainError::OutOfOrder {
                    predecessor,
                    successor: kind,
                });
            }
        }

        previous = Some((kind, end));
    }

    let decision = phase.window(PhaseWindowKind::CameraReadyDecideStatus);
    if let (Some(start), Some(end)) = (decision.start(), decision.end()) {
        check_range(PhaseWindowKind::CameraReadyDecideStatus, start, end)?;
    }

    Ok(())
}

fn validate_rounds(phase: &ResearchPhase) -> Result<(), DomainError> {
    if phase.revision_rounds.is_empty() {
        return Ok(());
    }

    let revise: TimeWindow = phase
        .window(PhaseWindowKind::Revise)
        .as_time_window()
        .ok_or_else(|| missing(PhaseWindowKind::Revise, "start"))?;

    for round in &phase.revision_rounds {
        if !revise.contains_window(&round.window) {
            return Err(DomainError::RoundOutOfBounds {
                round_number: round.round_number.value(),
            });
        }
    }

    validate_round_set(&phase.revision_rounds)
}

/// Validates a set of revision rounds against each other.
///
/// Duplicate round numbers are reported before overlapping windows.
///
/// # Errors
///
/// Returns `DuplicateRound` or `RoundOverlap`.
pub fn validate_round_set(rounds: &[RevisionRound]) -> Result<(), DomainError> {
    let mut seen: HashSet<u32> = HashSet::new();
    for round in rounds {
        let number = round.round_number.value();
        if !seen.insert(number) {
            return Err(DomainError::DuplicateRound {
                round_number: number,
            });
        }
    }

    for (i, first) in rounds.iter().enumerate() {
        for second in &rounds[i + 1..] {
            if first.window.overlaps(&second.window) {
                return Err(DomainError::RoundOverlap {
                    first: first.round_number.value(),
                    second: second.round_number.value(),
                });
            }
        }
    }

    Ok(())
}

/// Validates the phases of one conference in edition order.
///
/// Each phase is validated on its own first. A later phase must open
/// registration strictly after the previous phase's final window ends.
///
/// # Arguments
///
/// * `phases` - The phases, primary edition first
///
/// # Errors
///
/// Returns the first phase-level error, or `PhaseOverlap`.
pub fn validate_phase_sequence(phases: &[ResearchPhase]) -> Result<(), DomainError> {
    for phase in phases {
        validate_phase(phase)?;
    }

    for (index, pair) in phases.windows(2).enumerate() {
        let (primary, secondary) = (&pair[0], &pair[1]);
        let primary_end = primary
            .final_end()
            .ok_or_else(|| missing(PhaseWindowKind::AuthorPayment, "end"))?;
        let secondary_start = secondary
            .registration
            .start()
            .ok_or_else(|| missing(PhaseWindowKind::Registration, "start"))?;

        if secondary_start <= primary_end {
            return Err(DomainError::PhaseOverlap {
                primary: index,
                secondary: index + 1,
            });
        }
    }

    Ok(())
}

fn check_range(
    kind: PhaseWindowKind,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<(), DomainError> {
    if start >= end {
        return Err(DomainError::InvalidRange {
            window: kind.as_str().to_string(),
            start,
            end,
        });
    }
    Ok(())
}

fn missing(kind: PhaseWindowKind, bound: &str) -> DomainError {
    DomainError::MissingField {
        field: format!("{}.{bound}", kind.as_str()),
    }
}
