// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Numbered revision rounds nested inside a phase's revise window.

use crate::entity::{EntityKind, Identity, Tracked};
use crate::error::DomainError;
use crate::time_window::TimeWindow;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A positive revision round number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RoundNumber(u32);

impl RoundNumber {
    /// Creates a round number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRoundNumber` for zero.
    pub const fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidRoundNumber(value));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RoundNumber {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoundNumber> for u32 {
    fn from(number: RoundNumber) -> Self {
        number.0
    }
}

/// Temporal state of a round relative to a given instant.
///
/// Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    /// The round's window has not opened yet.
    Pending,
    /// The round's window is open (bounds included).
    Open,
    /// The round's window has closed.
    Expired,
}

impl RoundState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Open => "open",
            Self::Expired => "expired",
        }
    }
}

/// A numbered resubmission cycle with its deadline window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRound {
    #[serde(default)]
    pub id: Identity,
    pub round_number: RoundNumber,
    pub window: TimeWindow,
}

impl RevisionRound {
    /// Creates a round that has not been persisted yet.
    #[must_use]
    pub const fn new(round_number: RoundNumber, window: TimeWindow) -> Self {
        Self {
            id: Identity::Local,
            round_number,
            window,
        }
    }

    /// Creates a round with an existing persisted id.
    #[must_use]
    pub fn with_id(id: &str, round_number: RoundNumber, window: TimeWindow) -> Self {
        Self {
            id: Identity::persisted(id),
            round_number,
            window,
        }
    }

    /// Returns the state of this round at `now`.
    #[must_use]
    pub fn state_at(&self, now: OffsetDateTime) -> RoundState {
        if now < self.window.start() {
            RoundState::Pending
        } else if now <= self.window.end() {
            RoundState::Open
        } else {
            RoundState::Expired
        }
    }
}

impl Tracked for RevisionRound {
    const KIND: EntityKind = EntityKind::RevisionRoundDeadline;

    fn identity(&self) -> &Identity {
        &self.id
    }
}
