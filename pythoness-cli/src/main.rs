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

//! `pythoness`: how much of a GitHub user's circle writes a given language.

mod config;
mod report;

use anyhow::{bail, Result};
use clap::Parser;
use config::PythonessConfig;
use pythoness_github::{Gateway, GitHubApi, HttpTransport};
use pythoness_graph::{AssessError, Assessor, MemoCache, RequestShape};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub username to check (default: the owner of the access token)
    who: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GitHub token for private repo access, see https://github.com/settings/tokens
    #[arg(short, long, conflicts_with_all = ["public", "token_file"])]
    token: Option<String>,

    /// File holding the GitHub token (default: ~/.pythoness)
    #[arg(long, conflicts_with = "public")]
    token_file: Option<PathBuf>,

    /// Ignore all private repos (so a token is unnecessary)
    #[arg(long)]
    public: bool,

    /// Skip the user's own repos
    #[arg(long)]
    no_self: bool,

    /// Count repos the user starred
    #[arg(short, long)]
    star: bool,

    /// Skip the accounts the user follows (depth=1)
    #[arg(long)]
    no_following: bool,

    /// Check followers' repos (depth=1)
    #[arg(short = 'F', long)]
    followers: bool,

    /// Language to measure (overrides config file)
    #[arg(short, long)]
    language: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Log every request and scored repository
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,pythoness=debug,pythoness_core=debug,pythoness_github=debug,pythoness_graph=debug"
    } else {
        "warn,pythoness=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(args: Args) -> Result<()> {
    let mut config = PythonessConfig::load(args.config)?;

    // Apply CLI overrides
    if let Some(token) = args.token {
        config.auth.token = Some(token);
    }
    if let Some(path) = args.token_file {
        config.auth.token = None;
        config.auth.token_file = Some(path);
    }
    if let Some(language) = args.language {
        config.scoring.language = language;
    }
    config.validate()?;

    let token = if args.public {
        None
    } else {
        config.resolve_token()?
    };

    let shape = RequestShape {
        own: !args.no_self,
        star: args.star,
        following: !args.no_following,
        followers: args.followers,
        public_only: token.is_none(),
    };
    if shape.categories().is_empty() {
        bail!("Nothing to check: enable at least one of self, following or followers");
    }

    let transport = HttpTransport::new(config.api.base_url.clone(), token, &config.api.user_agent)?;
    let gateway = Arc::new(Gateway::new(Arc::new(transport), config.gateway_config()));
    let assessor = Assessor::new(
        GitHubApi::new(Arc::clone(&gateway)),
        config.scorer(),
        Arc::new(MemoCache::new()),
    );

    let result = assessor.assess(args.who.as_deref(), shape).await?;

    tracing::debug!(
        requests = gateway.submitted(),
        cache = ?assessor.cache().stats(),
        "Done"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report::render_text(&result, &config.scoring.language, &mut std::io::stdout().lock())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            if let Some(assess) = e.downcast_ref::<AssessError>() {
                if let Some(status) = assess.status() {
                    eprintln!("Status: {}", status);
                }
                if let Some(body) = assess.body() {
                    eprintln!("{}", body);
                }
            }
            ExitCode::FAILURE
        }
    }
}
