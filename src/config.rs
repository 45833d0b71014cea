use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Base URL of the GitLab instance (no trailing slash).
    pub gitlab_url: String,
    /// OAuth application id registered on the GitLab instance.
    pub client_id: String,
    /// OAuth application secret. Never logged.
    pub client_secret: String,
    /// Redirect URI registered with the OAuth application.
    /// Must point at this service's /callback route.
    pub redirect_uri: String,
    /// HMAC secret for signing session credentials.
    pub session_secret: String,
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let session_secret = std::env::var("GITDASH_SESSION_SECRET")
        .unwrap_or_else(|_| "CHANGE_ME_SESSION_SECRET".into());

    if session_secret == "CHANGE_ME_SESSION_SECRET" {
        let env_mode = std::env::var("GITDASH_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "GITDASH_SESSION_SECRET is still the insecure placeholder. \
                 Set a proper random secret before running in production."
            );
        }
        eprintln!("⚠️  GITDASH_SESSION_SECRET is not set — using insecure placeholder. Set a random secret for production.");
    }

    let client_id = std::env::var("GITDASH_CLIENT_ID")
        .map_err(|_| anyhow::anyhow!("GITDASH_CLIENT_ID is not set"))?;
    let client_secret = std::env::var("GITDASH_CLIENT_SECRET")
        .map_err(|_| anyhow::anyhow!("GITDASH_CLIENT_SECRET is not set"))?;
    let redirect_uri = std::env::var("GITDASH_REDIRECT_URI")
        .map_err(|_| anyhow::anyhow!("GITDASH_REDIRECT_URI is not set"))?;

    Ok(Config {
        port: std::env::var("GITDASH_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .unwrap_or(8080),
        gitlab_url: std::env::var("GITDASH_GITLAB_URL")
            .unwrap_or_else(|_| "https://gitlab.com".into())
            .trim_end_matches('/')
            .to_string(),
        client_id,
        client_secret,
        redirect_uri,
        session_secret,
    })
}
