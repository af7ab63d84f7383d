use auth::{AuthClient, AuthError, SignInRequest};
use axum::http::{HeaderMap, header};
use config::AuthConfig;
use integration_tests::AuthMock;

fn client_for(base_url: &str) -> AuthClient {
    let config = AuthConfig {
        base_url: Some(base_url.parse().unwrap()),
    };

    AuthClient::new(&config).unwrap()
}

#[tokio::test]
async fn session_is_resolved_from_forwarded_cookie() {
    let auth = AuthMock::new()
        .with_session("session=valid", "user-1")
        .spawn()
        .await
        .unwrap();

    let client = client_for(&auth.base_url());

    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, "session=valid".parse().unwrap());

    let session = client.session(&headers).await.unwrap().unwrap();

    assert_eq!(session.user.id, "user-1");
    assert_eq!(session.user.email.as_deref(), Some("dev@example.com"));
    assert!(session.session.unwrap().expires_at.is_some());
}

#[tokio::test]
async fn missing_credentials_resolve_to_no_session() {
    let auth = AuthMock::new()
        .with_session("session=valid", "user-1")
        .spawn()
        .await
        .unwrap();

    let client = client_for(&auth.base_url());

    let session = client.session(&HeaderMap::new()).await.unwrap();

    assert!(session.is_none());
}

#[tokio::test]
async fn sign_in_returns_a_token() {
    let auth = AuthMock::new().spawn().await.unwrap();
    let client = client_for(&auth.base_url());

    let response = client
        .sign_in_email(&SignInRequest {
            email: "dev@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.token.as_deref(), Some("test-session-token"));
    assert_eq!(response.user.id, "user-1");
}

#[tokio::test]
async fn sign_in_with_bad_credentials_is_a_service_error() {
    let auth = AuthMock::new().spawn().await.unwrap();
    let client = client_for(&auth.base_url());

    let error = client
        .sign_in_email(&SignInRequest {
            email: "dev@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    let AuthError::Service { status, .. } = error else {
        unreachable!("expected a service error, got {error}");
    };

    assert_eq!(status, 401);
}

#[tokio::test]
async fn sign_out_succeeds_with_forwarded_credentials() {
    let auth = AuthMock::new()
        .with_session("session=valid", "user-1")
        .spawn()
        .await
        .unwrap();

    let client = client_for(&auth.base_url());

    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, "session=valid".parse().unwrap());

    client.sign_out(&headers).await.unwrap();
}
