// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Repository scorer
//!
//! Maps a repository's language byte counts to a bounded score and a pair of
//! weights. The score saturates once the tracked language reaches [`CRIT`] of
//! the repository and falls off steeply below it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::{LanguageByteCounts, RepoDescriptor, RepoKind, ScoredItem};

/// Ratio at and above which a repository scores 1
pub const CRIT: f64 = 2.0 / 3.0;

pub const DEFAULT_LANGUAGE: &str = "Python";

/// Errors from policy validation
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("Seat weight for {0} repositories must be a finite non-negative number")]
    InvalidSeats(&'static str),

    #[error("Tracked language must not be empty")]
    EmptyLanguage,
}

/// Vote weights (dimension A) per repository kind.
///
/// Only owned repositories contribute to the volume dimension (B).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatPolicy {
    #[serde(default = "default_owned_seats")]
    pub owned: f64,
    #[serde(default = "default_fork_seats")]
    pub fork: f64,
    #[serde(default = "default_starred_seats")]
    pub starred: f64,
}

fn default_owned_seats() -> f64 {
    1000.0
}

fn default_fork_seats() -> f64 {
    50.0
}

fn default_starred_seats() -> f64 {
    10.0
}

impl Default for SeatPolicy {
    fn default() -> Self {
        Self {
            owned: default_owned_seats(),
            fork: default_fork_seats(),
            starred: default_starred_seats(),
        }
    }
}

impl SeatPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (label, value) in [
            ("owned", self.owned),
            ("fork", self.fork),
            ("starred", self.starred),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PolicyError::InvalidSeats(label));
            }
        }
        Ok(())
    }

    /// Seats for a repository of `kind` holding `total_bytes` of code
    pub fn seats_for(&self, kind: RepoKind, total_bytes: u64) -> (f64, f64) {
        match kind {
            RepoKind::Owned => (self.owned, total_bytes as f64),
            RepoKind::Fork => (self.fork, 0.0),
            RepoKind::Starred => (self.starred, 0.0),
        }
    }
}

/// Threshold transform of `target_bytes / total_bytes`.
///
/// Returns 0 when the tracked language is absent, 1 at or above [`CRIT`],
/// and `1 - exp(1 + CRIT / (ratio - CRIT))` in between. The curve is
/// continuous at both ends of the open interval.
pub fn affinity(target_bytes: u64, total_bytes: u64) -> f64 {
    if target_bytes == 0 || total_bytes == 0 {
        return 0.0;
    }
    let ratio = target_bytes as f64 / total_bytes as f64;
    if ratio >= CRIT {
        1.0
    } else {
        // exponent is <= 0 on (0, CRIT); clamp keeps rounding from leaving [0, 1]
        (1.0 - (1.0 + CRIT / (ratio - CRIT)).exp()).clamp(0.0, 1.0)
    }
}

/// Scores repositories for one tracked language
#[derive(Debug, Clone)]
pub struct RepoScorer {
    language: String,
    seats: SeatPolicy,
}

impl Default for RepoScorer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE, SeatPolicy::default())
    }
}

impl RepoScorer {
    pub fn new(language: impl Into<String>, seats: SeatPolicy) -> Self {
        Self {
            language: language.into(),
            seats,
        }
    }

    pub fn seats(&self) -> &SeatPolicy {
        &self.seats
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.language.trim().is_empty() {
            return Err(PolicyError::EmptyLanguage);
        }
        self.seats.validate()
    }

    /// Score one repository from its language byte counts
    pub fn score(&self, repo: &RepoDescriptor, languages: &LanguageByteCounts) -> ScoredItem {
        let target_bytes = languages.get(&self.language).copied().unwrap_or(0);
        let total_bytes = languages
            .values()
            .fold(0u64, |acc, bytes| acc.saturating_add(*bytes));
        let score = affinity(target_bytes, total_bytes);
        let (seats_a, seats_b) = self.seats.seats_for(repo.kind(), total_bytes);

        debug!(
            repo = %repo.full_name(),
            kind = ?repo.kind(),
            target_bytes,
            total_bytes,
            score,
            seats_a,
            seats_b,
            "Scored repository"
        );

        ScoredItem::new(score, seats_a, seats_b)
    }

    /// Item for a repository whose language data could not be fetched.
    ///
    /// Scored as if it held none of the tracked language, with no volume.
    pub fn unreachable(&self, repo: &RepoDescriptor) -> ScoredItem {
        let (seats_a, _) = self.seats.seats_for(repo.kind(), 0);
        ScoredItem::new(0.0, seats_a, 0.0)
    }
}
