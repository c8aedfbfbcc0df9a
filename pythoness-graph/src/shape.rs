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

use pythoness_core::Category;
use serde::{Deserialize, Serialize};

/// Which categories to compute for a user, and with what visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestShape {
    /// Score the user's own repositories
    pub own: bool,
    /// Include starred repositories in the self category
    pub star: bool,
    pub following: bool,
    pub followers: bool,
    /// Ignore private repositories
    pub public_only: bool,
}

impl Default for RequestShape {
    fn default() -> Self {
        Self {
            own: true,
            star: false,
            following: true,
            followers: false,
            public_only: true,
        }
    }
}

impl RequestShape {
    /// Shape used when a neighbor is expanded: public repositories only, no further hops
    pub fn neighbor() -> Self {
        Self {
            own: true,
            star: false,
            following: false,
            followers: false,
            public_only: true,
        }
    }

    /// Only public, self-only results are shared through the cache.
    pub fn is_memoizable(&self) -> bool {
        self.public_only && self.own && !self.following && !self.followers
    }

    pub fn categories(&self) -> Vec<Category> {
        let mut out = Vec::new();
        if self.own {
            out.push(Category::Own);
        }
        if self.following {
            out.push(Category::Following);
        }
        if self.followers {
            out.push(Category::Followers);
        }
        out
    }
}
