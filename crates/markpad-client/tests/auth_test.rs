//! Auth client against a mock auth service.

use std::sync::Arc;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use markpad_client::{AuthClient, ClientConfig, Transport};
use markpad_core::{Error, Session};

async fn setup() -> (MockServer, AuthClient) {
    let auth_server = MockServer::start().await;
    let config = ClientConfig {
        auth_url: auth_server.uri(),
        storage_url: "http://localhost:1".to_string(),
        timeout_seconds: 5,
    };
    let transport = Arc::new(Transport::new(&config).unwrap());
    (auth_server, AuthClient::new(transport))
}

#[tokio::test]
async fn test_login_sends_credentials_and_authenticates() {
    let (server, auth) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v1/login"))
        .and(body_json(
            serde_json::json!({ "username": "alice", "password": "s3cret" }),
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    auth.login("alice", "s3cret").await.unwrap();
    assert_eq!(auth.session_state(), Session::Authenticated);
}

#[tokio::test]
async fn test_login_failure_stays_unauthenticated() {
    let (server, auth) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v1/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "error": "Invalid credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    // A login rejection is not an expired session: no refresh attempt.
    Mock::given(method("POST"))
        .and(path("/v1/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = auth.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
    assert_eq!(auth.session_state(), Session::Unauthenticated);
}

#[tokio::test]
async fn test_register_does_not_authenticate() {
    let (server, auth) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v1/register"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    auth.register("bob", "pw12345").await.unwrap();
    assert_eq!(auth.session_state(), Session::Unauthenticated);
}

#[tokio::test]
async fn test_logout_clears_session_even_when_server_fails() {
    let (server, auth) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v1/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    auth.login("alice", "s3cret").await.unwrap();
    let err = auth.logout().await.unwrap_err();
    assert!(matches!(err, Error::Api { .. }));
    assert_eq!(auth.session_state(), Session::Unauthenticated);
}

#[tokio::test]
async fn test_health_probe() {
    let (server, auth) = setup().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    auth.health().await.unwrap();
}

#[tokio::test]
async fn test_check_session_reports_state_without_error() {
    let (server, auth) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v1/check_auth"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "error": "Missing access token" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    // check_auth's expiry answer triggers one refresh attempt first.
    Mock::given(method("POST"))
        .and(path("/v1/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let state = auth.check_session().await.unwrap();
    assert_eq!(state, Session::Unauthenticated);
}
