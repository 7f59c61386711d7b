use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cinema_booking::config::AuthConfig;
use cinema_booking::error::AuthError;
use cinema_booking::services::IdentityClient;

fn client(base_url: &str) -> IdentityClient {
    IdentityClient::from_config(&AuthConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
    })
}

#[tokio::test]
async fn sign_in_opens_a_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/signin"))
        .and(header("X-Api-Key", "test-key"))
        .and(body_partial_json(json!({
            "email": "john@example.com",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "uid-1",
            "idToken": "tok-abc",
            "displayName": "John Doe",
            "email": "john@example.com"
        })))
        .mount(&server)
        .await;

    let auth = client(&server.uri());
    assert!(auth.current_principal().is_none());

    let principal = auth.sign_in("john@example.com", "hunter22").await.unwrap();
    assert_eq!(principal.id, "uid-1");
    assert_eq!(principal.display_name.as_deref(), Some("John Doe"));

    assert!(auth.is_authenticated());
    assert_eq!(auth.id_token().as_deref(), Some("tok-abc"));

    auth.sign_out();
    assert!(auth.current_principal().is_none());
    assert!(auth.id_token().is_none());
}

#[tokio::test]
async fn bad_credentials_leave_the_session_closed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "invalid credentials"
        })))
        .mount(&server)
        .await;

    let auth = client(&server.uri());
    let err = auth.sign_in("john@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn sign_up_registers_and_signs_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/signup"))
        .and(body_partial_json(json!({
            "email": "jane@example.com",
            "displayName": "Jane"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "uid-2",
            "idToken": "tok-new",
            "displayName": "Jane",
            "email": "jane@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = client(&server.uri());
    let principal = auth.sign_up("jane@example.com", "s3cret!", "Jane").await.unwrap();
    assert_eq!(principal.id, "uid-2");
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn provider_outage_is_a_rejection_not_a_panic() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts/signin"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "message": "maintenance"
        })))
        .mount(&server)
        .await;

    let auth = client(&server.uri());
    let err = auth.sign_in("john@example.com", "hunter22").await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected { status: 503, .. }));
}
