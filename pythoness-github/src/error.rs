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

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the gateway. They are passed to callers unchanged.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API error: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Gateway is closed")]
    Closed,
}

impl GatewayError {
    /// Remote status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Remote response body, when the server answered with an error status
    pub fn body(&self) -> Option<&str> {
        match self {
            GatewayError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}
