//! Router-level tests: auth rejection paths, the OAuth callback contract,
//! and the composed dashboard served end to end against a mocked GitLab.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gitdash::config::Config;
use gitdash::AppState;

fn app(gitlab_url: &str) -> (axum::Router, Arc<AppState>) {
    let cfg = Config {
        port: 0,
        gitlab_url: gitlab_url.trim_end_matches('/').to_string(),
        client_id: "app-id".into(),
        client_secret: "app-secret".into(),
        redirect_uri: "http://localhost:8080/callback".into(),
        session_secret: "test-secret".into(),
    };
    let state = Arc::new(AppState::new(cfg).unwrap());
    (gitdash::api::router().with_state(state.clone()), state)
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn test_user() -> gitdash::models::gitlab::UserProfile {
    gitdash::models::gitlab::UserProfile {
        id: 42,
        username: "jdev".into(),
        name: "Jo Dev".into(),
        avatar_url: None,
        web_url: None,
    }
}

#[tokio::test]
async fn login_redirects_to_provider_authorize_endpoint() {
    let (app, _) = app("https://gitlab.example.com");

    let resp = app.oneshot(get("/login")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = resp.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://gitlab.example.com/oauth/authorize"));
    assert!(location.contains("client_id=app-id"));
    assert!(location.contains("response_type=code"));
}

#[tokio::test]
async fn callback_without_code_is_400_and_never_hits_token_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _) = app(&server.uri());
    let resp = app.oneshot(get("/callback")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_string(resp).await;
    assert!(body.contains("missing_code"), "body: {}", body);
    // MockServer verifies the expect(0) on drop.
}

#[tokio::test]
async fn callback_mints_a_verifiable_session_credential() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "glpat-fresh",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "username": "jdev",
            "name": "Jo Dev"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, state) = app(&server.uri());
    let resp = app.oneshot(get("/callback?code=the-code")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("localStorage.setItem('gitdash_session'"));

    // Pull the JWT out of the delivered page and verify it server-side.
    let token = body
        .split("gitdash_session', '")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .expect("session token embedded in callback page");

    let claims = state.session.verify(token).unwrap();
    assert_eq!(claims.sub, "jdev");
    assert_eq!(claims.user.id, 42);
    assert_eq!(claims.gitlab_token, "glpat-fresh");
}

#[tokio::test]
async fn dashboard_without_credential_is_401() {
    let (app, _) = app("https://gitlab.example.com");

    let resp = app.oneshot(get("/home/auth")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dashboard_with_foreign_signature_is_401() {
    let (app, _) = app("https://gitlab.example.com");

    let other_keys = gitdash::session::SessionKeys::new("some-other-secret");
    let forged = other_keys.mint(&test_user(), "glpat-x").unwrap();

    let resp = app
        .oneshot(get_with_bearer("/home/auth", &forged))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dashboard_with_expired_credential_is_401() {
    let (app, state) = app("https://gitlab.example.com");

    let expired = state
        .session
        .mint_with_ttl(&test_user(), "glpat-x", chrono::Duration::hours(-1))
        .unwrap();

    let resp = app
        .oneshot(get_with_bearer("/home/auth", &expired))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dashboard_serves_composed_json_for_valid_credential() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (app, state) = app(&server.uri());
    let session = state.session.mint(&test_user(), "glpat-live").unwrap();

    let resp = app
        .oneshot(get_with_bearer("/home/auth", &session))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["user"]["username"], "jdev");
    assert_eq!(body["events"], json!([]));
    assert_eq!(body["groups"], json!([]));
}

#[tokio::test]
async fn upstream_failure_surfaces_generic_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/groups"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let (app, state) = app(&server.uri());
    let session = state.session.mint(&test_user(), "glpat-live").unwrap();

    let resp = app
        .oneshot(get_with_bearer("/home/auth", &session))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(resp).await;
    // Generic message only; no hint of which fetch failed.
    assert!(body.contains("fetch error"), "body: {}", body);
    assert!(!body.contains("maintenance"));
    assert!(!body.contains("groups"));
}

#[tokio::test]
async fn logout_clears_the_client_side_credential() {
    let (app, _) = app("https://gitlab.example.com");

    let resp = app.oneshot(get("/home/logout")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("localStorage.removeItem('gitdash_session')"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (app, _) = app("https://gitlab.example.com");

    let resp = app.oneshot(get("/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
