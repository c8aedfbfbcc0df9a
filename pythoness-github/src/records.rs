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

//! Typed records for the parts of API responses we read.
//!
//! Unknown fields are ignored; missing optional fields fall back to defaults.

use pythoness_core::RepoDescriptor;
use serde::Deserialize;

/// A user account as it appears in listings and in `/user`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub login: String,
}

/// A repository as it appears in repository and star listings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Account,
    #[serde(default)]
    pub fork: bool,
}

impl Repository {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }

    pub fn owned_descriptor(&self) -> RepoDescriptor {
        RepoDescriptor::owned(self.owner.login.clone(), self.name.clone(), self.fork)
    }

    pub fn starred_descriptor(&self) -> RepoDescriptor {
        RepoDescriptor::starred(self.owner.login.clone(), self.name.clone(), self.fork)
    }
}
