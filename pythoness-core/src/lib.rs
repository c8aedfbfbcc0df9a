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

//! Pythoness Core
//!
//! Data model and pure scoring functions for measuring how much of a user's
//! code is written in one tracked language.
//!
//! - [`scorer`] turns one repository's language byte counts into a [`ScoredItem`].
//! - [`congress`] folds many scored items into a single [`Aggregate`].
//! - [`model`] holds the records shared with the graph orchestrator.
//!
//! Nothing in this crate performs I/O.

pub mod congress;
pub mod model;
pub mod scorer;

pub use congress::congress;
pub use model::{
    Aggregate, Category, CategoryResult, LanguageByteCounts, RepoDescriptor, RepoKind,
    ScoredItem, UserResult,
};
pub use scorer::{affinity, PolicyError, RepoScorer, SeatPolicy, CRIT, DEFAULT_LANGUAGE};
