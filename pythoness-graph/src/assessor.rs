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

//! Graph orchestrator
//!
//! Computes a [`UserResult`] from up to three categories:
//!
//! - **self**: the user's repositories (and optionally stars), scored per
//!   repository and aggregated together.
//! - **following** / **followers**: each neighbor is assessed on its own public
//!   repositories and contributes one flat vote. Neighbors are never expanded
//!   further.
//!
//! Categories, repositories and neighbors are all issued concurrently; the
//! gateway is the only place requests are throttled.

use futures::future::{self, BoxFuture, FutureExt};
use pythoness_core::{
    Category, CategoryResult, RepoDescriptor, RepoScorer, ScoredItem, UserResult,
};
use pythoness_github::{Account, GitHubApi, Repository};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::cache::{MemoCache, MemoKey};
use crate::error::AssessError;
use crate::shape::RequestShape;

#[derive(Debug, Clone, Copy)]
enum Relation {
    Following,
    Followers,
}

impl Relation {
    fn category(self) -> Category {
        match self {
            Relation::Following => Category::Following,
            Relation::Followers => Category::Followers,
        }
    }
}

/// Assesses users against one tracked language
pub struct Assessor {
    api: GitHubApi,
    scorer: RepoScorer,
    cache: Arc<MemoCache>,
    identity: OnceCell<String>,
}

impl Assessor {
    pub fn new(api: GitHubApi, scorer: RepoScorer, cache: Arc<MemoCache>) -> Self {
        Self {
            api,
            scorer,
            cache,
            identity: OnceCell::new(),
        }
    }

    pub fn cache(&self) -> &Arc<MemoCache> {
        &self.cache
    }

    /// Login of the authenticated account, looked up once
    pub async fn authenticated_login(&self) -> Result<&str, AssessError> {
        if !self.api.is_authenticated() {
            return Err(AssessError::Configuration(
                "no access token is configured, so the authenticated account is unknown"
                    .to_string(),
            ));
        }
        let login = self
            .identity
            .get_or_try_init(|| async {
                self.api
                    .authenticated_login()
                    .await
                    .map_err(|e| AssessError::fetch("the authenticated account", e))
            })
            .await?;
        Ok(login.as_str())
    }

    /// Assess `target`, or the authenticated account when `target` is `None`.
    ///
    /// Private repositories are only read for the authenticated account; for
    /// anyone else, or without a token, the request is downgraded to
    /// public-only.
    pub async fn assess(
        &self,
        target: Option<&str>,
        shape: RequestShape,
    ) -> Result<UserResult, AssessError> {
        let login = match target {
            Some(login) => login.to_string(),
            None => self.authenticated_login().await?.to_string(),
        };

        let mut shape = shape;
        if !shape.public_only && !self.api.is_authenticated() {
            warn!(
                user = %login,
                "No access token is configured, using public repositories"
            );
            shape.public_only = true;
        }
        if !shape.public_only {
            let me = self.authenticated_login().await?;
            if !me.eq_ignore_ascii_case(&login) {
                warn!(
                    user = %login,
                    authenticated = %me,
                    "Private repositories are only readable for the authenticated account, \
                     using public repositories"
                );
                shape.public_only = true;
            }
        }

        self.assess_user(&login, shape).await
    }

    fn assess_user<'a>(
        &'a self,
        login: &'a str,
        shape: RequestShape,
    ) -> BoxFuture<'a, Result<UserResult, AssessError>> {
        async move {
            let memo_key = shape
                .is_memoizable()
                .then(|| MemoKey::new(login, shape.star));
            if let Some(key) = &memo_key {
                if let Some(mut hit) = self.cache.get(key) {
                    debug!(user = %login, "Memoized result");
                    // keys are case-insensitive; answer with the casing asked for
                    hit.login = login.to_string();
                    return Ok(hit);
                }
            }

            let own = async {
                if shape.own {
                    Some(self.own_category(login, shape).await)
                } else {
                    None
                }
            };
            let following = async {
                if shape.following {
                    Some(self.neighbor_category(login, Relation::Following).await)
                } else {
                    None
                }
            };
            let followers = async {
                if shape.followers {
                    Some(self.neighbor_category(login, Relation::Followers).await)
                } else {
                    None
                }
            };
            let (own, following, followers) = tokio::join!(own, following, followers);

            let mut categories = BTreeMap::new();
            let mut failure = None;
            for (category, outcome) in [
                (Category::Own, own),
                (Category::Following, following),
                (Category::Followers, followers),
            ] {
                match outcome {
                    Some(Ok(result)) => {
                        categories.insert(category, result);
                    }
                    Some(Err(e)) => {
                        warn!(user = %login, category = %category, error = %e, "Category failed");
                        failure.get_or_insert(e);
                    }
                    None => {}
                }
            }
            if let Some(e) = failure {
                return Err(e);
            }

            let result = UserResult::from_categories(login, categories, self.scorer.seats());
            info!(
                user = %login,
                score = result.score,
                seats_a = result.total_seats_a,
                seats_b = result.total_seats_b,
                "Assessed user"
            );

            if let Some(key) = memo_key {
                self.cache.insert(key, result.clone());
            }
            Ok(result)
        }
        .boxed()
    }

    async fn own_category(
        &self,
        login: &str,
        shape: RequestShape,
    ) -> Result<CategoryResult, AssessError> {
        let repos = async {
            let listing = if shape.public_only {
                self.api.public_repos(login).await
            } else {
                self.api.own_repos().await
            };
            listing.map_err(|e| AssessError::fetch(format!("repositories of {}", login), e))
        };
        let stars = async {
            if !shape.star {
                return Ok(Vec::new());
            }
            let listing = if shape.public_only {
                self.api.starred(login).await
            } else {
                self.api.own_starred().await
            };
            listing.map_err(|e| AssessError::fetch(format!("starred repositories of {}", login), e))
        };
        let (repos, stars): (Vec<Repository>, Vec<Repository>) = tokio::try_join!(repos, stars)?;

        let descriptors: Vec<RepoDescriptor> = repos
            .iter()
            .map(Repository::owned_descriptor)
            .chain(
                stars
                    .iter()
                    // a star on one's own repository is already counted as owned
                    .filter(|r| !r.owner.login.eq_ignore_ascii_case(login))
                    .map(Repository::starred_descriptor),
            )
            .collect();

        debug!(user = %login, repos = repos.len(), stars = stars.len(), "Scoring repositories");

        let scored = future::join_all(descriptors.iter().map(|d| self.score_repo(d))).await;
        let items = descriptors
            .iter()
            .map(RepoDescriptor::full_name)
            .zip(scored)
            .collect();
        Ok(CategoryResult::from_items(items))
    }

    /// Language fetch failures are recovered here as an empty repository.
    async fn score_repo(&self, repo: &RepoDescriptor) -> ScoredItem {
        match self.api.languages(&repo.owner, &repo.name).await {
            Ok(languages) => self.scorer.score(repo, &languages),
            Err(e) => {
                warn!(
                    repo = %repo.full_name(),
                    error = %e,
                    "Could not read repository languages; treated as empty"
                );
                self.scorer.unreachable(repo)
            }
        }
    }

    async fn neighbor_category(
        &self,
        login: &str,
        relation: Relation,
    ) -> Result<CategoryResult, AssessError> {
        let listing = match relation {
            Relation::Following => self.api.following(login).await,
            Relation::Followers => self.api.followers(login).await,
        };
        let accounts: Vec<Account> = listing.map_err(|e| {
            AssessError::fetch(format!("{} of {}", relation.category(), login), e)
        })?;

        debug!(user = %login, relation = ?relation, count = accounts.len(), "Expanding neighbors");

        let results = future::join_all(
            accounts
                .iter()
                .map(|a| self.assess_user(&a.login, RequestShape::neighbor())),
        )
        .await;

        let mut items = BTreeMap::new();
        for (account, result) in accounts.iter().zip(results) {
            items.insert(account.login.clone(), ScoredItem::neighbor(result?.score));
        }
        Ok(CategoryResult::from_items(items))
    }
}
