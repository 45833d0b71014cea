use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Json,
};
use serde::Deserialize;

use super::Session;
use crate::errors::AppError;
use crate::models::view::Dashboard;
use crate::pipeline;
use crate::AppState;

/// `GET /login` — send the browser to the provider's authorize endpoint.
pub async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    let url = state.oauth.authorize_url()?;
    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
}

/// `GET /callback?code=...` — complete the exchange and hand the minted
/// session credential to the browser for local storage. A missing code is a
/// 400 and never reaches the token endpoint.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Html<String>, AppError> {
    let code = params.code.as_deref().ok_or(AppError::MissingCode)?;

    let access_token = state.oauth.exchange_code(code).await?;
    let user = state.upstream.current_user(&access_token).await?;
    let session = state.session.mint(&user, &access_token)?;

    tracing::info!(user = %user.username, "OAuth login completed");

    // JWTs are base64url, so interpolating into the script is safe.
    Ok(Html(format!(
        "<!DOCTYPE html><html><body><script>\
         localStorage.setItem('gitdash_session', '{}');\
         window.location.replace('/');\
         </script></body></html>",
        session
    )))
}

/// `GET /home/auth` — the composed dashboard for the authenticated user.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Session(claims): Session,
) -> Result<Json<Dashboard>, AppError> {
    let dashboard =
        pipeline::build_dashboard(&state.upstream, &claims.gitlab_token, claims.user).await?;
    Ok(Json(dashboard))
}

/// `GET /home/logout` — clear the client-side credential. Nothing to revoke
/// server-side; the credential simply stops being presented.
pub async fn logout() -> Html<&'static str> {
    Html(
        "<!DOCTYPE html><html><body><script>\
         localStorage.removeItem('gitdash_session');\
         window.location.replace('/');\
         </script></body></html>",
    )
}
