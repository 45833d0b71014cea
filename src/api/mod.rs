use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::session::SessionClaims;
use crate::AppState;

pub mod handlers;

/// Build the dashboard router. All routes are relative — the caller supplies
/// the shared state and mounts this at the root.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(handlers::login))
        .route("/callback", get(handlers::callback))
        .route("/home/auth", get(handlers::dashboard))
        .route("/home/logout", get(handlers::logout))
        .layer(TraceLayer::new_for_http())
        .fallback(fallback_404)
}

async fn fallback_404() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Extractor: verified session credential from the `Authorization` header.
/// Missing header, malformed token, bad signature, or expiry all reject with
/// 401 before the handler runs.
pub struct Session(pub SessionClaims);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        let claims = state.session.verify(token)?;
        Ok(Session(claims))
    }
}
