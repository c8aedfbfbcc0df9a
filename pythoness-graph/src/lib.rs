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

//! Graph orchestration for language affinity.
//!
//! [`Assessor`] scores a user from their own repositories and, one hop out,
//! from the accounts they follow and the accounts following them. Results for
//! neighbors are memoized in a [`MemoCache`] for the life of the cache.

pub mod assessor;
pub mod cache;
pub mod error;
pub mod shape;

pub use assessor::Assessor;
pub use cache::{CacheStats, MemoCache, MemoKey};
pub use error::AssessError;
pub use shape::RequestShape;
