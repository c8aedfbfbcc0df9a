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

//! Outbound access to the code-hosting API.
//!
//! All calls go through a [`Gateway`], which bounds the number of requests in
//! flight and applies a per-request timeout. [`GitHubApi`] wraps the gateway
//! with typed endpoints; [`HttpTransport`] is the reqwest-backed transport.

pub mod api;
pub mod error;
pub mod gateway;
pub mod records;
pub mod transport;

pub use api::GitHubApi;
pub use error::GatewayError;
pub use gateway::{ApiRequest, Gateway, GatewayConfig, Transport};
pub use records::{Account, Repository};
pub use transport::{HttpTransport, DEFAULT_BASE_URL};
