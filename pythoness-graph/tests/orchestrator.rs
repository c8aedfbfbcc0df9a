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

// Orchestrator tests against a scripted transport

use async_trait::async_trait;
use pythoness_core::{Category, RepoScorer, SeatPolicy, CRIT};
use pythoness_github::{ApiRequest, Gateway, GatewayConfig, GatewayError, GitHubApi, Transport};
use pythoness_graph::{AssessError, Assessor, MemoCache, RequestShape};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Answers requests from a route table keyed by path and records every path hit
#[derive(Default)]
struct ScriptedTransport {
    routes: HashMap<String, Result<Value, u16>>,
    hits: Mutex<Vec<String>>,
    token: bool,
}

impl ScriptedTransport {
    fn authenticated(mut self, login: &str) -> Self {
        self.token = true;
        self.routes
            .insert("/user".to_string(), Ok(json!({ "login": login })));
        self
    }

    fn route(mut self, path: &str, body: Value) -> Self {
        self.routes.insert(path.to_string(), Ok(body));
        self
    }

    fn fail(mut self, path: &str, status: u16) -> Self {
        self.routes.insert(path.to_string(), Err(status));
        self
    }

    /// Public repositories of `user`, each `(name, fork)`
    fn repos(self, user: &str, repos: &[(&str, bool)]) -> Self {
        let body = repos_json(user, repos);
        self.route(&format!("/users/{}/repos", user), body)
    }

    fn langs(self, owner: &str, repo: &str, body: Value) -> Self {
        self.route(&format!("/repos/{}/{}/languages", owner, repo), body)
    }

    fn following(self, user: &str, logins: &[&str]) -> Self {
        self.route(&format!("/users/{}/following", user), accounts_json(logins))
    }

    fn followers(self, user: &str, logins: &[&str]) -> Self {
        self.route(&format!("/users/{}/followers", user), accounts_json(logins))
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

fn repos_json(owner: &str, repos: &[(&str, bool)]) -> Value {
    Value::Array(
        repos
            .iter()
            .map(|(name, fork)| json!({ "name": name, "owner": { "login": owner }, "fork": fork }))
            .collect(),
    )
}

fn accounts_json(logins: &[&str]) -> Value {
    Value::Array(logins.iter().map(|l| json!({ "login": l })).collect())
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, GatewayError> {
        self.hits.lock().unwrap().push(request.path.clone());
        match self.routes.get(&request.path) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(GatewayError::Status {
                status: *status,
                body: json!({ "message": "scripted failure" }).to_string(),
            }),
            None => Err(GatewayError::Status {
                status: 404,
                body: json!({ "message": "Not Found" }).to_string(),
            }),
        }
    }

    fn is_authenticated(&self) -> bool {
        self.token
    }
}

fn assessor(transport: ScriptedTransport) -> (Assessor, Arc<ScriptedTransport>, Arc<Gateway>) {
    let transport = Arc::new(transport);
    let gateway = Arc::new(Gateway::new(transport.clone(), GatewayConfig::default()));
    let assessor = Assessor::new(
        GitHubApi::new(gateway.clone()),
        RepoScorer::default(),
        Arc::new(MemoCache::new()),
    );
    (assessor, transport, gateway)
}

fn self_only() -> RequestShape {
    RequestShape {
        own: true,
        star: false,
        following: false,
        followers: false,
        public_only: true,
    }
}

fn affinity_at(ratio: f64) -> f64 {
    1.0 - (1.0 + CRIT / (ratio - CRIT)).exp()
}

#[tokio::test]
async fn test_single_dominant_repo_scores_one() {
    let transport = ScriptedTransport::default()
        .repos("alice", &[("snake", false)])
        .langs("alice", "snake", json!({ "Python": 900, "Shell": 100 }));
    let (assessor, _, _) = assessor(transport);

    let result = assessor.assess(Some("alice"), self_only()).await.unwrap();
    assert_eq!(result.score, 1.0);
    assert_eq!(result.total_seats_b, 1000.0);
    assert_eq!(result.total_seats_a, SeatPolicy::default().owned);

    let own = result.category(Category::Own).unwrap();
    assert_eq!(own.items.len(), 1);
    assert_eq!(own.items["alice/snake"].score, 1.0);
}

#[tokio::test]
async fn test_expansion_stops_at_one_hop() {
    let transport = ScriptedTransport::default()
        .repos("alice", &[])
        .following("alice", &["bob"])
        .followers("alice", &["carol"])
        .repos("bob", &[("b1", false)])
        .langs("bob", "b1", json!({ "Python": 10 }))
        .following("bob", &["dave"])
        .followers("bob", &["erin"])
        .repos("carol", &[])
        .following("carol", &["frank"]);
    let (assessor, transport, _) = assessor(transport);

    let shape = RequestShape {
        followers: true,
        ..RequestShape::default()
    };
    let result = assessor.assess(Some("alice"), shape).await.unwrap();

    let hits = transport.hits();
    for forbidden in [
        "/users/bob/following",
        "/users/bob/followers",
        "/users/carol/following",
        "/users/carol/followers",
        "/users/dave/repos",
        "/users/erin/repos",
        "/users/frank/repos",
    ] {
        assert!(!hits.iter().any(|h| h == forbidden), "{} was fetched", forbidden);
    }
    assert!(hits.iter().any(|h| h == "/users/bob/repos"));
    assert!(hits.iter().any(|h| h == "/users/carol/repos"));

    // self 0, following = bob (1.0), followers = carol (0.0)
    assert_eq!(result.category(Category::Following).unwrap().score(), 1.0);
    assert_eq!(result.category(Category::Followers).unwrap().score(), 0.0);
    assert!((result.score - (1.0f64 / 3.0).sqrt()).abs() < 1e-12);
}

#[tokio::test]
async fn test_neighbors_are_flat_votes() {
    let transport = ScriptedTransport::default()
        .repos("alice", &[])
        .following("alice", &["bob", "carol"])
        // bob: one huge repository fully in the language
        .repos("bob", &[("big", false)])
        .langs("bob", "big", json!({ "Python": 10_000_000 }))
        // carol: one tiny repository without it
        .repos("carol", &[("tiny", false)])
        .langs("carol", "tiny", json!({ "Go": 10 }));
    let (assessor, _, _) = assessor(transport);

    let shape = RequestShape {
        own: false,
        ..RequestShape::default()
    };
    let result = assessor.assess(Some("alice"), shape).await.unwrap();
    let following = result.category(Category::Following).unwrap();

    assert_eq!(following.items["bob"].seats_a, 1.0);
    assert_eq!(following.items["bob"].seats_b, 1.0);
    assert!((following.score() - 0.5).abs() < 1e-12);
    assert!((result.score - 0.5).abs() < 1e-12);
    assert!(result.category(Category::Own).is_none());
    assert_eq!(result.total_seats_b, 0.0);
}

#[tokio::test]
async fn test_memoized_neighbor_issues_no_requests() {
    let transport = ScriptedTransport::default()
        .repos("bob", &[("b1", false), ("b2", true)])
        .langs("bob", "b1", json!({ "Python": 300, "C": 700 }))
        .langs("bob", "b2", json!({ "Python": 50 }));
    let (assessor, _, gateway) = assessor(transport);

    let first = assessor.assess(Some("bob"), self_only()).await.unwrap();
    let calls = gateway.submitted();
    assert_eq!(calls, 3);

    let second = assessor.assess(Some("bob"), self_only()).await.unwrap();
    assert_eq!(gateway.submitted(), calls);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(assessor.cache().stats().hits, 1);
}

#[tokio::test]
async fn test_shared_neighbor_is_reused_from_cache() {
    let transport = ScriptedTransport::default()
        .repos("alice", &[])
        .following("alice", &["bob"])
        .repos("bob", &[("b1", false)])
        .langs("bob", "b1", json!({ "Python": 1 }));
    let (assessor, transport, _) = assessor(transport);

    assessor.assess(Some("bob"), self_only()).await.unwrap();
    let shape = RequestShape {
        own: false,
        ..RequestShape::default()
    };
    let result = assessor.assess(Some("alice"), shape).await.unwrap();
    assert_eq!(result.score, 1.0);

    let bob_listings = transport
        .hits()
        .iter()
        .filter(|h| h.as_str() == "/users/bob/repos")
        .count();
    assert_eq!(bob_listings, 1);
}

#[tokio::test]
async fn test_expanding_shapes_are_not_cached() {
    let transport = ScriptedTransport::default()
        .repos("alice", &[])
        .following("alice", &[]);
    let (assessor, _, gateway) = assessor(transport);

    assessor.assess(Some("alice"), RequestShape::default()).await.unwrap();
    assessor.assess(Some("alice"), RequestShape::default()).await.unwrap();
    assert_eq!(gateway.submitted(), 4);
    assert!(assessor.cache().is_empty());
}

#[tokio::test]
async fn test_one_unreachable_repo_does_not_sink_the_rest() {
    let transport = ScriptedTransport::default()
        .repos("alice", &[("a", false), ("b", false), ("c", false)])
        .langs("alice", "a", json!({ "Python": 100 }))
        .fail("/repos/alice/b/languages", 500)
        .langs("alice", "c", json!({ "Python": 50, "Rust": 50 }));
    let (assessor, _, _) = assessor(transport);

    let result = assessor.assess(Some("alice"), self_only()).await.unwrap();
    let own = result.category(Category::Own).unwrap();

    assert_eq!(own.items.len(), 3);
    assert_eq!(own.items["alice/b"].score, 0.0);
    assert_eq!(own.items["alice/b"].seats_a, 1000.0);
    assert_eq!(own.items["alice/b"].seats_b, 0.0);

    let c = affinity_at(0.5);
    let mean_a = (1.0 + 0.0 + c) / 3.0;
    let mean_b = (100.0 + 100.0 * c) / 200.0;
    assert!((own.aggregate.mean_a() - mean_a).abs() < 1e-12);
    assert!((own.aggregate.mean_b() - mean_b).abs() < 1e-12);
    assert!(result.score > 0.0);
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let transport = ScriptedTransport::default()
        .repos("alice", &[])
        .fail("/users/alice/following", 502);
    let (assessor, _, _) = assessor(transport);

    let err = assessor
        .assess(Some("alice"), RequestShape::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AssessError::Fetch { .. }));
    assert_eq!(err.status(), Some(502));
    assert!(err.body().unwrap().contains("scripted failure"));
}

#[tokio::test]
async fn test_stars_vote_without_volume() {
    let transport = ScriptedTransport::default()
        .repos("alice", &[("mine", false)])
        .langs("alice", "mine", json!({ "Go": 100 }))
        .route(
            "/users/alice/starred",
            json!([
                { "name": "mine", "owner": { "login": "alice" } },
                { "name": "lib", "owner": { "login": "zed" } }
            ]),
        )
        .langs("zed", "lib", json!({ "Python": 1000 }));
    let (assessor, transport, _) = assessor(transport);

    let shape = RequestShape {
        star: true,
        ..self_only()
    };
    let result = assessor.assess(Some("alice"), shape).await.unwrap();
    let own = result.category(Category::Own).unwrap();

    assert_eq!(own.items.len(), 2);
    let star = own.items["zed/lib"];
    assert_eq!((star.score, star.seats_a, star.seats_b), (1.0, 10.0, 0.0));
    assert_eq!(own.aggregate.total_seats_b(), 100.0);
    assert!((own.aggregate.mean_a() - 10.0 / 1010.0).abs() < 1e-12);
    assert_eq!(own.aggregate.mean_b(), 0.0);

    // the self-star is never scored as a star
    let self_star_fetches = transport
        .hits()
        .iter()
        .filter(|h| h.as_str() == "/repos/alice/mine/languages")
        .count();
    assert_eq!(self_star_fetches, 1);
}

#[tokio::test]
async fn test_target_defaults_to_authenticated_account() {
    let transport = ScriptedTransport::default()
        .authenticated("me")
        .route("/user/repos", repos_json("me", &[("secret", false)]))
        .langs("me", "secret", json!({ "Python": 1 }));
    let (assessor, transport, _) = assessor(transport);

    let shape = RequestShape {
        public_only: false,
        ..self_only()
    };
    let result = assessor.assess(None, shape).await.unwrap();
    assert_eq!(result.login, "me");
    assert_eq!(result.score, 1.0);

    let hits = transport.hits();
    assert_eq!(hits.iter().filter(|h| h.as_str() == "/user").count(), 1);
    assert!(hits.iter().any(|h| h == "/user/repos"));
    assert!(!hits.iter().any(|h| h == "/users/me/repos"));
}

#[tokio::test]
async fn test_missing_target_without_token_is_a_configuration_error() {
    let (assessor, transport, _) = assessor(ScriptedTransport::default());
    let err = assessor.assess(None, self_only()).await.unwrap_err();
    assert!(matches!(err, AssessError::Configuration(_)));
    assert!(transport.hits().is_empty());
}

#[tokio::test]
async fn test_private_request_for_someone_else_is_downgraded() {
    let transport = ScriptedTransport::default()
        .authenticated("me")
        .repos("bob", &[]);
    let (assessor, transport, _) = assessor(transport);

    let shape = RequestShape {
        public_only: false,
        ..self_only()
    };
    assessor.assess(Some("bob"), shape).await.unwrap();

    let hits = transport.hits();
    assert!(hits.iter().any(|h| h == "/users/bob/repos"));
    assert!(!hits.iter().any(|h| h == "/user/repos"));
}

#[tokio::test]
async fn test_private_request_without_token_falls_back_to_public() {
    let transport = ScriptedTransport::default()
        .repos("bob", &[("b1", false)])
        .langs("bob", "b1", json!({ "Python": 1 }));
    let (assessor, transport, _) = assessor(transport);
    let shape = RequestShape {
        public_only: false,
        ..self_only()
    };
    let result = assessor.assess(Some("bob"), shape).await.unwrap();
    assert_eq!(result.score, 1.0);

    let hits = transport.hits();
    assert!(hits.iter().any(|h| h == "/users/bob/repos"));
    assert!(!hits.iter().any(|h| h == "/user" || h == "/user/repos"));
}

#[tokio::test]
async fn test_memoized_result_keeps_requested_login_casing() {
    let transport = ScriptedTransport::default()
        .repos("octo", &[("o1", false)])
        .langs("octo", "o1", json!({ "Python": 1 }));
    let (assessor, _, gateway) = assessor(transport);

    let first = assessor.assess(Some("octo"), self_only()).await.unwrap();
    assert_eq!(first.login, "octo");
    let calls = gateway.submitted();

    let second = assessor.assess(Some("Octo"), self_only()).await.unwrap();
    assert_eq!(gateway.submitted(), calls);
    assert_eq!(second.login, "Octo");
    assert_eq!(second.score, first.score);
    assert_eq!(second.categories, first.categories);
}
