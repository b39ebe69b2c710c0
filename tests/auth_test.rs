mod common;

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use common::{ScriptedBrowser, basic_auth_header, harness, mount_token, settings};
use playlist_pilot::{
    AuthError,
    config::Settings,
    spotify::auth::exchange_code,
    tools,
};
use serde_json::json;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

#[tokio::test]
async fn test_authenticate_runs_full_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", basic_auth_header().as_str()))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=test-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token",
            "token_type": "Bearer",
            "scope": "playlist-modify-private user-read-private",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(settings(&server), ScriptedBrowser::approving("test-code"));
    let result = tools::authenticate(&h.session).await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        result.get("scopes"),
        Some(&json!(["playlist-modify-private", "user-read-private"]))
    );

    let credential = h.session.credentials().get().await.unwrap();
    assert_eq!(credential.access_token, "user-token");

    let opened = h.browser.opened();
    assert_eq!(opened.len(), 1);
    let url = Url::parse(&opened[0]).unwrap();
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(url.path(), "/authorize");
    assert_eq!(params["client_id"], common::CLIENT_ID);
    assert_eq!(params["response_type"], "code");
    assert_eq!(
        params["redirect_uri"],
        h.session.settings().redirect_uri()
    );
}

#[tokio::test]
async fn test_authenticate_reuses_cached_credential() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let h = harness(settings(&server), ScriptedBrowser::approving("test-code"));

    assert!(tools::authenticate(&h.session).await.success);
    assert!(tools::authenticate(&h.session).await.success);

    assert_eq!(h.browser.consent_pages_opened(), 1);
}

#[tokio::test]
async fn test_concurrent_authenticate_runs_one_session() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let h = harness(settings(&server), ScriptedBrowser::approving("test-code"));

    let (first, second) = tokio::join!(
        tools::authenticate(&h.session),
        tools::authenticate(&h.session)
    );

    assert!(first.success, "{:?}", first.error);
    assert!(second.success, "{:?}", second.error);
    assert_eq!(h.browser.consent_pages_opened(), 1);
}

#[tokio::test]
async fn test_authenticate_times_out_and_releases_port() {
    let server = MockServer::start().await;
    mount_token(&server, 0).await;

    let settings = Settings {
        auth_timeout: Duration::from_millis(300),
        ..settings(&server)
    };
    let port = settings.callback_port;
    let h = harness(settings, ScriptedBrowser::idle());

    let started = Instant::now();
    let result = tools::authenticate(&h.session).await;
    let elapsed = started.elapsed();

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("authentication timed out"));
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_secs(5));
    assert!(!h.session.credentials().is_authenticated().await);

    std::net::TcpListener::bind(("127.0.0.1", port)).unwrap();
}

#[tokio::test]
async fn test_authenticate_waits_for_dwell_before_returning() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let settings = Settings {
        auth_dwell: Duration::from_millis(250),
        ..settings(&server)
    };
    let h = harness(settings, ScriptedBrowser::approving("test-code"));

    let started = Instant::now();
    let result = tools::authenticate(&h.session).await;

    assert!(result.success, "{:?}", result.error);
    assert!(started.elapsed() >= Duration::from_millis(250));
}

#[tokio::test]
async fn test_denied_consent_is_rejected() {
    let server = MockServer::start().await;
    mount_token(&server, 0).await;

    let h = harness(settings(&server), ScriptedBrowser::denying("access_denied"));
    let result = tools::authenticate(&h.session).await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("access_denied"));
    assert!(!h.session.credentials().is_authenticated().await);
}

#[tokio::test]
async fn test_token_error_is_rejected_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .mount(&server)
        .await;

    let h = harness(settings(&server), ScriptedBrowser::approving("stale-code"));
    let result = tools::authenticate(&h.session).await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("Invalid authorization code"));
    assert!(!h.session.credentials().is_authenticated().await);
}

#[tokio::test]
async fn test_occupied_callback_port_fails_fast() {
    let server = MockServer::start().await;
    let occupant = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let settings = Settings {
        callback_port: occupant.local_addr().unwrap().port(),
        ..settings(&server)
    };

    let h = harness(settings, ScriptedBrowser::approving("test-code"));
    let started = Instant::now();
    let result = tools::authenticate(&h.session).await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("cannot bind"));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(h.browser.opened().is_empty());
}

#[tokio::test]
async fn test_exchange_code_without_access_token_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer"
        })))
        .mount(&server)
        .await;

    let err = exchange_code(&reqwest::Client::new(), &settings(&server), "code")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Rejected(_)));
}

#[tokio::test]
async fn test_exchange_code_falls_back_to_requested_scopes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token"
        })))
        .mount(&server)
        .await;

    let settings = settings(&server);
    let credential = exchange_code(&reqwest::Client::new(), &settings, "code")
        .await
        .unwrap();

    assert_eq!(credential.access_token, "user-token");
    assert_eq!(credential.scopes, settings.scopes);
}
