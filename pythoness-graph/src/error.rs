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

use pythoness_github::GatewayError;
use thiserror::Error;

/// Errors that abort an assessment (or one of its categories)
#[derive(Debug, Error)]
pub enum AssessError {
    /// Not retryable; the request itself cannot be served
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A listing or identity lookup failed, so the branch cannot proceed
    #[error("Failed to fetch {what}: {source}")]
    Fetch {
        what: String,
        #[source]
        source: GatewayError,
    },
}

impl AssessError {
    pub fn fetch(what: impl Into<String>, source: GatewayError) -> Self {
        AssessError::Fetch {
            what: what.into(),
            source,
        }
    }

    /// Remote status code of the failed call, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AssessError::Fetch { source, .. } => source.status(),
            AssessError::Configuration(_) => None,
        }
    }

    /// Remote response body of the failed call, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            AssessError::Fetch { source, .. } => source.body(),
            AssessError::Configuration(_) => None,
        }
    }
}
