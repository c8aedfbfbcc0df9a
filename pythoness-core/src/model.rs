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

//! Records exchanged between the scorer, the aggregator and the orchestrator.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::scorer::SeatPolicy;

/// Language name to byte count, as reported for one repository.
pub type LanguageByteCounts = HashMap<String, u64>;

/// How a repository relates to the user being assessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    /// Authored by the subject, not a fork
    Owned,
    /// Forked by the subject from someone else
    Fork,
    /// Starred by the subject, owned by someone else
    Starred,
}

/// Identifies one repository to be scored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDescriptor {
    pub owner: String,
    pub name: String,
    pub is_fork: bool,
    pub is_starred: bool,
}

impl RepoDescriptor {
    pub fn owned(owner: impl Into<String>, name: impl Into<String>, is_fork: bool) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            is_fork,
            is_starred: false,
        }
    }

    pub fn starred(owner: impl Into<String>, name: impl Into<String>, is_fork: bool) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            is_fork,
            is_starred: true,
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Starred takes precedence over fork.
    pub fn kind(&self) -> RepoKind {
        if self.is_starred {
            RepoKind::Starred
        } else if self.is_fork {
            RepoKind::Fork
        } else {
            RepoKind::Owned
        }
    }
}

/// One weighted observation fed to the aggregator.
///
/// `seats_a` and `seats_b` are independent weight dimensions: A is a per-item
/// vote, B follows code volume. They are only ever summed within their own
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub score: f64,
    pub seats_a: f64,
    pub seats_b: f64,
}

impl ScoredItem {
    pub fn new(score: f64, seats_a: f64, seats_b: f64) -> Self {
        Self {
            score,
            seats_a,
            seats_b,
        }
    }

    /// A neighbor in the social graph: one flat vote in both dimensions.
    pub fn neighbor(score: f64) -> Self {
        Self::new(score, 1.0, 1.0)
    }
}

/// Result of [`crate::congress`]. Only the aggregator constructs non-empty values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    mean_a: f64,
    mean_b: f64,
    score: f64,
    total_seats_a: f64,
    total_seats_b: f64,
}

impl Aggregate {
    pub(crate) fn from_means(
        mean_a: f64,
        mean_b: f64,
        total_seats_a: f64,
        total_seats_b: f64,
    ) -> Self {
        Self {
            mean_a,
            mean_b,
            score: ((mean_a * mean_a + mean_b * mean_b) / 2.0).sqrt(),
            total_seats_a,
            total_seats_b,
        }
    }

    pub fn mean_a(&self) -> f64 {
        self.mean_a
    }

    pub fn mean_b(&self) -> f64 {
        self.mean_b
    }

    /// Root mean square of the two means
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn total_seats_a(&self) -> f64 {
        self.total_seats_a
    }

    pub fn total_seats_b(&self) -> f64 {
        self.total_seats_b
    }
}

/// Categories of an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The user's own repositories (and optionally their stars)
    #[serde(rename = "self")]
    Own,
    #[serde(rename = "following")]
    Following,
    #[serde(rename = "followers")]
    Followers,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Own => "self",
            Category::Following => "following",
            Category::Followers => "followers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate of one category plus the per-item detail it was built from.
///
/// Items are keyed by repository full name or by login. The detail is kept
/// for reporting only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub aggregate: Aggregate,
    pub items: BTreeMap<String, ScoredItem>,
}

impl CategoryResult {
    /// Aggregate `items` and keep them for reporting.
    pub fn from_items(items: BTreeMap<String, ScoredItem>) -> Self {
        Self {
            aggregate: crate::congress(items.values()),
            items,
        }
    }

    pub fn score(&self) -> f64 {
        self.aggregate.score()
    }
}

/// Final output of assessing one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResult {
    pub login: String,
    pub score: f64,
    pub categories: BTreeMap<Category, CategoryResult>,
    /// Vote weight this user would carry; derived from the self category
    pub total_seats_a: f64,
    /// Byte volume found in the self category
    pub total_seats_b: f64,
}

impl UserResult {
    /// Combine category results into the final score.
    ///
    /// The final score is the unweighted root mean square of the category
    /// scores. With no categories the score is 0.
    pub fn from_categories(
        login: impl Into<String>,
        categories: BTreeMap<Category, CategoryResult>,
        seats: &SeatPolicy,
    ) -> Self {
        let score = if categories.is_empty() {
            0.0
        } else {
            let sum_sq: f64 = categories.values().map(|c| c.score() * c.score()).sum();
            (sum_sq / categories.len() as f64).sqrt()
        };

        let (total_seats_a, total_seats_b) = match categories.get(&Category::Own) {
            Some(own) => {
                let volume = own.aggregate.total_seats_b();
                let vote = if volume > 0.0 { seats.owned } else { seats.starred };
                (vote, volume)
            }
            None => (0.0, 0.0),
        };

        Self {
            login: login.into(),
            score,
            categories,
            total_seats_a,
            total_seats_b,
        }
    }

    pub fn category(&self, category: Category) -> Option<&CategoryResult> {
        self.categories.get(&category)
    }
}
