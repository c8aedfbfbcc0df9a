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

//! Memoization cache for assessed users.
//!
//! Entries live as long as the cache and are never invalidated, so a cache
//! must not outlive the period over which remote data is assumed stable.
//! Two tasks computing the same key concurrently both insert; the last write
//! wins.

use dashmap::DashMap;
use pythoness_core::UserResult;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Cache key: the user plus the parts of the request shape that vary among
/// memoizable requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    login: String,
    star: bool,
}

impl MemoKey {
    pub fn new(login: &str, star: bool) -> Self {
        // logins are case-insensitive on the hosting side
        Self {
            login: login.to_ascii_lowercase(),
            star,
        }
    }
}

/// Concurrency-safe map from [`MemoKey`] to [`UserResult`]
#[derive(Debug, Default)]
pub struct MemoCache {
    entries: DashMap<MemoKey, UserResult>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &MemoKey) -> Option<UserResult> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: MemoKey, value: UserResult) {
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            entries: self.entries.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: usize,
}
