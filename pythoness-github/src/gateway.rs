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

//! Request gateway
//!
//! Every outbound call is admitted through a counting semaphore so that
//! recursive fan-out never has more than `max_concurrent` requests in flight.
//! Callers waiting for a slot are suspended without blocking other tasks.
//! Errors from the transport are returned as-is; there is no retry here.

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::GatewayError;

/// Performs one HTTP exchange and returns the decoded JSON body
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<serde_json::Value, GatewayError>;

    /// Whether requests carry a credential
    fn is_authenticated(&self) -> bool;
}

/// Describes one API call relative to the transport's base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Maximum requests in flight
    pub max_concurrent: usize,

    /// Timeout for one HTTP exchange, not counting time spent queued
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 32,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Bounded-concurrency front for a [`Transport`]
pub struct Gateway {
    transport: Arc<dyn Transport>,
    semaphore: Arc<Semaphore>,
    config: GatewayConfig,
    submitted: AtomicU64,
}

impl Gateway {
    pub fn new(transport: Arc<dyn Transport>, config: GatewayConfig) -> Self {
        // a zero-permit semaphore would park every caller forever
        let permits = config.max_concurrent.max(1);
        Self {
            transport,
            semaphore: Arc::new(Semaphore::new(permits)),
            config: GatewayConfig {
                max_concurrent: permits,
                ..config
            },
            submitted: AtomicU64::new(0),
        }
    }

    /// Submit a request, waiting for a free slot first
    pub async fn submit(&self, request: ApiRequest) -> Result<serde_json::Value, GatewayError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| GatewayError::Closed)?;
        self.submitted.fetch_add(1, Ordering::Relaxed);

        debug!(
            method = %request.method,
            path = %request.path,
            query = ?request.query,
            "API request"
        );

        match tokio::time::timeout(self.config.timeout, self.transport.send(&request)).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(e)) => {
                debug!(path = %request.path, error = %e, "API request failed");
                Err(e)
            }
            Err(_) => {
                debug!(path = %request.path, "API request timed out");
                Err(GatewayError::Timeout(self.config.timeout))
            }
        }
    }

    /// Submit a request and decode the body into `T`
    pub async fn submit_as<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, GatewayError> {
        let body = self.submit(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub fn is_authenticated(&self) -> bool {
        self.transport.is_authenticated()
    }

    pub fn capacity(&self) -> usize {
        self.config.max_concurrent
    }

    /// Requests currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.config.max_concurrent - self.semaphore.available_permits()
    }

    /// Requests admitted since construction
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }
}
