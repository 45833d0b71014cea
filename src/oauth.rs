//! OAuth2 authorization-code exchange against the GitLab instance.
//!
//! Two transitions only: build the authorize redirect, then swap the
//! callback code for an access token. Nothing is persisted server-side; the
//! token goes straight into the minted session credential.

use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::errors::AppError;

/// Scopes requested from GitLab: profile, REST API, repository metadata.
const OAUTH_SCOPES: &str = "read_user api read_repository";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct OauthExchange {
    client: reqwest::Client,
    gitlab_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OauthExchange {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            gitlab_url: cfg.gitlab_url.clone(),
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            redirect_uri: cfg.redirect_uri.clone(),
        })
    }

    /// Where `GET /login` sends the browser.
    pub fn authorize_url(&self) -> Result<String, AppError> {
        let mut url = Url::parse(&format!("{}/oauth/authorize", self.gitlab_url))
            .map_err(|e| AppError::Internal(anyhow::anyhow!("bad authorize URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", OAUTH_SCOPES);
        Ok(url.into())
    }

    /// Server-to-server code→token exchange. Any failure (network, provider
    /// rejection, malformed body) collapses to `Upstream`; there is no retry
    /// and no partial state to clean up.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let resp = self
            .client
            .post(format!("{}/oauth/token", self.gitlab_url))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("token exchange failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "token endpoint returned {}",
                resp.status()
            )));
        }

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("token response decode failed: {}", e)))?;

        Ok(body.access_token)
    }
}
