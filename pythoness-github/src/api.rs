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

//! Typed endpoints of the GitHub REST API.
//!
//! Only the first page of each listing is read.

use pythoness_core::LanguageByteCounts;
use std::sync::Arc;

use crate::error::GatewayError;
use crate::gateway::{ApiRequest, Gateway};
use crate::records::{Account, Repository};

/// Typed view of the API, backed by a shared [`Gateway`]
#[derive(Clone)]
pub struct GitHubApi {
    gateway: Arc<Gateway>,
}

impl GitHubApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn is_authenticated(&self) -> bool {
        self.gateway.is_authenticated()
    }

    /// Login of the account the credential belongs to
    pub async fn authenticated_login(&self) -> Result<String, GatewayError> {
        let me: Account = self.gateway.submit_as(ApiRequest::get("/user")).await?;
        Ok(me.login)
    }

    /// Repositories owned by the authenticated account, private ones included
    pub async fn own_repos(&self) -> Result<Vec<Repository>, GatewayError> {
        let request = ApiRequest::get("/user/repos")
            .query("visibility", "all")
            .query("affiliation", "owner")
            .query("sort", "pushed");
        self.gateway.submit_as(request).await
    }

    /// Public repositories of `user`
    pub async fn public_repos(&self, user: &str) -> Result<Vec<Repository>, GatewayError> {
        let request = ApiRequest::get(format!("/users/{}/repos", user)).query("sort", "pushed");
        self.gateway.submit_as(request).await
    }

    /// Repositories starred by the authenticated account
    pub async fn own_starred(&self) -> Result<Vec<Repository>, GatewayError> {
        self.gateway.submit_as(ApiRequest::get("/user/starred")).await
    }

    /// Repositories starred by `user`
    pub async fn starred(&self, user: &str) -> Result<Vec<Repository>, GatewayError> {
        self.gateway
            .submit_as(ApiRequest::get(format!("/users/{}/starred", user)))
            .await
    }

    pub async fn following(&self, user: &str) -> Result<Vec<Account>, GatewayError> {
        self.gateway
            .submit_as(ApiRequest::get(format!("/users/{}/following", user)))
            .await
    }

    pub async fn followers(&self, user: &str) -> Result<Vec<Account>, GatewayError> {
        self.gateway
            .submit_as(ApiRequest::get(format!("/users/{}/followers", user)))
            .await
    }

    /// Byte count per language for `owner/repo`
    pub async fn languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<LanguageByteCounts, GatewayError> {
        self.gateway
            .submit_as(ApiRequest::get(format!("/repos/{}/{}/languages", owner, repo)))
            .await
    }
}
