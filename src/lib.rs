//! GitDash — library crate for integration testing.
//!
//! Re-exports modules needed by integration tests in `tests/`.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod oauth;
pub mod pipeline;
pub mod session;
pub mod upstream;

use oauth::OauthExchange;
use session::SessionKeys;
use upstream::UpstreamClient;

/// Shared application state passed to handlers and extractors.
pub struct AppState {
    pub config: config::Config,
    pub session: SessionKeys,
    pub oauth: OauthExchange,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: config::Config) -> anyhow::Result<Self> {
        Ok(Self {
            session: SessionKeys::new(&config.session_secret),
            oauth: OauthExchange::new(&config)?,
            upstream: UpstreamClient::new(&config.gitlab_url)?,
            config,
        })
    }
}
