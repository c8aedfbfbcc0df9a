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

use anyhow::{bail, Context, Result};
use pythoness_core::{RepoScorer, SeatPolicy, DEFAULT_LANGUAGE};
use pythoness_github::{GatewayConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pythoness configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PythonessConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum requests in flight
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// Language whose share is measured (as named by the API)
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub seats: SeatPolicy,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Access token; takes precedence over `token_file`
    pub token: Option<String>,

    /// File holding the access token (default: ~/.pythoness when present)
    pub token_file: Option<PathBuf>,
}

// Default values
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_concurrent() -> usize {
    32
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "pythoness".to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// `~/.pythoness`, if it exists
pub fn default_token_file() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".pythoness"))
        .filter(|path| path.exists())
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_concurrent: default_max_concurrent(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            seats: SeatPolicy::default(),
        }
    }
}

impl PythonessConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration: defaults, then the file if given, then environment.
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)
                    .with_context(|| format!("Invalid configuration file {}", path.display()))?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from environment variables
    ///
    /// Supported variables:
    /// - PYTHONESS_API_URL: API base URL
    /// - PYTHONESS_MAX_CONCURRENT: maximum requests in flight (default: 32)
    /// - PYTHONESS_TIMEOUT: per-request timeout in seconds (default: 10)
    /// - PYTHONESS_LANGUAGE: tracked language (default: Python)
    /// - PYTHONESS_TOKEN or GITHUB_TOKEN: access token
    /// - PYTHONESS_TOKEN_FILE: access token file
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PYTHONESS_API_URL") {
            self.api.base_url = url;
        }

        if let Some(max) = lookup("PYTHONESS_MAX_CONCURRENT") {
            if let Ok(val) = max.parse() {
                self.api.max_concurrent = val;
            }
        }

        if let Some(timeout) = lookup("PYTHONESS_TIMEOUT") {
            if let Ok(val) = timeout.parse() {
                self.api.timeout_secs = val;
            }
        }

        if let Some(language) = lookup("PYTHONESS_LANGUAGE") {
            self.scoring.language = language;
        }

        if let Some(token) = lookup("PYTHONESS_TOKEN").or_else(|| lookup("GITHUB_TOKEN")) {
            self.auth.token = Some(token);
        }

        if let Some(path) = lookup("PYTHONESS_TOKEN_FILE") {
            self.auth.token_file = Some(PathBuf::from(path));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.max_concurrent == 0 {
            bail!("api.max_concurrent must be at least 1");
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be at least 1");
        }
        self.scorer()
            .validate()
            .context("Invalid scoring configuration")?;
        Ok(())
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            max_concurrent: self.api.max_concurrent,
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    pub fn scorer(&self) -> RepoScorer {
        RepoScorer::new(self.scoring.language.clone(), self.scoring.seats)
    }

    /// Access token from the config or, failing that, from the token file.
    ///
    /// Returns `Ok(None)` when neither is configured. An unreadable or empty
    /// token file is an error.
    pub fn resolve_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.auth.token.as_deref().map(str::trim) {
            if !token.is_empty() {
                return Ok(Some(token.to_string()));
            }
        }

        let path = match self.auth.token_file.clone().or_else(default_token_file) {
            Some(path) => path,
            None => return Ok(None),
        };
        let raw = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Could not read token file {}. Please check that it exists and is readable",
                path.display()
            )
        })?;
        let token = raw.trim();
        if token.is_empty() {
            bail!("Token file {} is empty", path.display());
        }
        Ok(Some(token.to_string()))
    }
}
