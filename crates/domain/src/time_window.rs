// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time windows.
//!
//! ## Invariants
//!
//! - A `TimeWindow` always satisfies `start < end`
//! - All predicates use closed-interval semantics
//! - A `PhaseWindow` may be entirely undated ("not yet configured")
//! - `duration_days` is authoritative when deriving a phase window's end

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// A dated, non-empty interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = DomainError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    /// Creates a new window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRange` if `start >= end`. Zero-length
    /// windows are rejected.
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidRange {
                window: String::from("window"),
                start,
                end,
            });
        }
        Ok(Self { start, end })
    }

    /// Returns the window start.
    #[must_use]
    pub const fn start(&self) -> OffsetDateTime {
        self.start
    }

    /// Returns the window end.
    #[must_use]
    pub const fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// Returns true if `point` lies within the window, bounds included.
    #[must_use]
    pub fn contains(&self, point: OffsetDateTime) -> bool {
        self.start <= point && point <= self.end
    }

    /// Returns true if `other` lies entirely within this window.
    #[must_use]
    pub fn contains_window(&self, other: &Self) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// Returns true if the two windows share at least one instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns true if this window ends no later than `other` starts.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.end <= other.start
    }

    /// Length of the window in whole days, truncated.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).whole_days()
    }
}

/// One sub-window of a research phase as configured by the organizer.
///
/// Unlike [`TimeWindow`], either bound may be missing while the phase is
/// still being edited. Validation decides whether that is acceptable.
///
/// Deserializing derives `end` from `start` and `duration_days` whenever
/// both are present, replacing any stored end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPhaseWindow")]
pub struct PhaseWindow {
    #[serde(default, with = "time::serde::rfc3339::option")]
    start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    end: Option<OffsetDateTime>,
    #[serde(default)]
    duration_days: Option<u16>,
}

#[derive(Deserialize)]
struct RawPhaseWindow {
    #[serde(default, with = "time::serde::rfc3339::option")]
    start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    end: Option<OffsetDateTime>,
    #[serde(default)]
    duration_days: Option<u16>,
}

impl TryFrom<RawPhaseWindow> for PhaseWindow {
    type Error = DomainError;

    fn try_from(raw: RawPhaseWindow) -> Result<Self, Self::Error> {
        let mut window = Self {
            start: raw.start,
            end: raw.end,
            duration_days: raw.duration_days,
        };
        window.recompute_end()?;
        Ok(window)
    }
}

impl PhaseWindow {
    /// A window that has not been configured yet.
    #[must_use]
    pub const fn undated() -> Self {
        Self {
            start: None,
            end: None,
            duration_days: None,
        }
    }

    /// A window with explicit bounds and no declared duration.
    ///
    /// Bounds are not checked here; ordering problems are reported by
    /// phase validation so they surface in sequence order.
    #[must_use]
    pub const fn dated(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            duration_days: None,
        }
    }

    /// A window starting at `start` and lasting `duration_days` days.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DurationOverflow` if the end cannot be represented.
    pub fn with_start(start: OffsetDateTime, duration_days: u16) -> Result<Self, DomainError> {
        let mut window = Self {
            start: Some(start),
            end: None,
            duration_days: Some(duration_days),
        };
        window.recompute_end()?;
        Ok(window)
    }

    /// Returns the configured start, if any.
    #[must_use]
    pub const fn start(&self) -> Option<OffsetDateTime> {
        self.start
    }

    /// Returns the configured end, if any.
    #[must_use]
    pub const fn end(&self) -> Option<OffsetDateTime> {
        self.end
    }

    /// Returns the declared duration in days, if any.
    #[must_use]
    pub const fn duration_days(&self) -> Option<u16> {
        self.duration_days
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub const fn is_undated(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Moves the start, keeping the declared duration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DurationOverflow` if the derived end overflows.
    pub fn set_start(&mut self, start: OffsetDateTime) -> Result<(), DomainError> {
        self.start = Some(start);
        self.recompute_end()
    }

    /// Changes the declared duration and derives the new end.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DurationOverflow` if the derived end overflows.
    pub fn set_duration_days(&mut self, days: u16) -> Result<(), DomainError> {
        self.duration_days = Some(days);
        self.recompute_end()
    }

    /// Derives `end` from `start + duration_days`.
    ///
    /// Windows without a start or without a declared duration are left as is.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DurationOverflow` if the derived end overflows.
    pub fn recompute_end(&mut self) -> Result<(), DomainError> {
        if let (Some(start), Some(days)) = (self.start, self.duration_days) {
            let end = start
                .checked_add(Duration::days(i64::from(days)))
                .ok_or_else(|| DomainError::DurationOverflow {
                    window: format!("{start} + {days} days"),
                })?;
            self.end = Some(end);
        }
        Ok(())
    }

    /// Returns the window as a [`TimeWindow`] when fully dated and well formed.
    #[must_use]
    pub fn as_time_window(&self) -> Option<TimeWindow> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => TimeWindow::new(start, end).ok(),
            _ => None,
        }
    }
}
