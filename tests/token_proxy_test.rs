use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cinemontauge::{
    Ctx,
    config::{AppConfig, DatabaseConfig, OAuthConfig},
    create_router, entities,
};

async fn app(token_url: Option<String>) -> Router {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    if let Some(token_url) = token_url {
        config.oauth = OAuthConfig {
            token_url,
            client_id: "cinemontauge".to_string(),
            client_secret: "s3cret".to_string(),
            redirect_uri: "https://app.test/callback".to_string(),
        };
    }

    let db = entities::connect(&config.database).await.unwrap();
    create_router(Ctx::new(db, config).unwrap())
}

async fn post_token(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_code_exchange_is_relayed() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc"))
        .and(body_string_contains("client_id=cinemontauge"))
        .and(body_string_contains("client_secret=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-1",
            "refresh_token": "refresh-1",
            "expires_in": 7776000,
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app(Some(format!("{}/oauth/token", upstream.uri()))).await;
    let (status, body) = post_token(&app, json!({"code": "abc"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "token-1");
    assert_eq!(body["refresh_token"], "refresh-1");
}

#[tokio::test]
async fn test_refresh_error_keeps_upstream_status() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&upstream)
        .await;

    let app = app(Some(format!("{}/oauth/token", upstream.uri()))).await;
    let (status, body) = post_token(&app, json!({"refreshToken": "stale"})).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "invalid_grant"}));
}

#[tokio::test]
async fn test_missing_grant_is_bad_request() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let app = app(Some(format!("{}/oauth/token", upstream.uri()))).await;
    let (status, body) = post_token(&app, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Nothing listens on the discard port
    let app = app(Some("http://127.0.0.1:9/oauth/token".to_string())).await;
    let (status, body) = post_token(&app, json!({"code": "abc"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_only_post_is_allowed() {
    let app = app(Some("http://127.0.0.1:9/oauth/token".to_string())).await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/token")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unconfigured_exchange_is_unavailable() {
    let app = app(None).await;
    let (status, body) = post_token(&app, json!({"code": "abc"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 503);
}
