//! Client for the external auth service.
//!
//! Planforge does not verify credentials itself. Sessions are resolved by
//! forwarding the caller's credential headers to the auth service, which
//! answers with the session and its user, or with nothing.

#![deny(missing_docs)]

mod error;

use std::time::Duration;

use chrono::{DateTime, Utc};
use config::AuthConfig;
use http::{HeaderMap, header};
use serde::{Deserialize, Serialize};
use url::Url;

pub use error::AuthError;

const SESSION_ENDPOINT: &str = "api/auth/get-session";
const SIGN_IN_ENDPOINT: &str = "api/auth/sign-in/email";
const SIGN_OUT_ENDPOINT: &str = "api/auth/sign-out";

/// A session resolved from request credentials.
///
/// Consumed, never mutated. The user identifier gates plan persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// The user who owns the session.
    pub user: User,
    /// Session metadata, when the auth service provides it.
    #[serde(default)]
    pub session: Option<SessionData>,
}

/// The principal behind a session.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Stable user identifier.
    pub id: String,
    /// E-mail address, if the auth service exposes one.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name, if the auth service exposes one.
    #[serde(default)]
    pub name: Option<String>,
}

/// Session metadata as reported by the auth service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    /// Opaque session token.
    #[serde(default)]
    pub token: Option<String>,
    /// Session expiry, if reported.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Credentials for the e-mail sign-in operation.
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    /// Account e-mail address.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Response of a successful e-mail sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Bearer token for subsequent requests.
    #[serde(default)]
    pub token: Option<String>,
    /// The signed-in user.
    pub user: User,
}

/// Client for the external auth service.
///
/// The base URL defaults to the local development server; production
/// deployments configure the public application URL.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    /// Create a client from the auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Connection(format!("Failed to create HTTP client for auth service: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    /// Resolve the session behind the given request headers.
    ///
    /// `Cookie` and `Authorization` headers are forwarded verbatim. A missing
    /// or rejected session resolves to `None`; only transport-level problems
    /// are errors.
    pub async fn session(&self, headers: &HeaderMap) -> Result<Option<Session>, AuthError> {
        let url = self.endpoint(SESSION_ENDPOINT)?;
        let request = self.forward_credentials(self.client.get(url), headers);

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Connection(format!("Failed to reach auth service: {e}")))?;

        let status = response.status();

        if status == http::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(AuthError::Service {
                status: status.as_u16(),
                message,
            });
        }

        // The auth service answers `null` for anonymous callers.
        let session: Option<Session> = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        Ok(session)
    }

    /// Sign in with e-mail and password.
    pub async fn sign_in_email(&self, request: &SignInRequest) -> Result<SignInResponse, AuthError> {
        let url = self.endpoint(SIGN_IN_ENDPOINT)?;

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| AuthError::Connection(format!("Failed to reach auth service: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(AuthError::Service {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }

    /// Invalidate the session behind the given request headers.
    pub async fn sign_out(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let url = self.endpoint(SIGN_OUT_ENDPOINT)?;
        let request = self.forward_credentials(self.client.post(url), headers);

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Connection(format!("Failed to reach auth service: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(AuthError::Service {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthError::InvalidResponse(format!("Invalid auth service URL: {e}")))
    }

    fn forward_credentials(&self, mut request: reqwest::RequestBuilder, headers: &HeaderMap) -> reqwest::RequestBuilder {
        for name in [header::COOKIE, header::AUTHORIZATION] {
            if let Some(value) = headers.get(&name) {
                request = request.header(name.clone(), value.clone());
            }
        }

        request
    }
}

#[cfg(test)]
mod tests {
    use super::Session;

    #[test]
    fn session_with_user_deserializes() {
        let body = serde_json::json!({
            "session": {
                "token": "abc123",
                "expiresAt": "2026-08-04T12:00:00.000Z"
            },
            "user": {
                "id": "user-1",
                "email": "dev@example.com",
                "name": "Dev"
            }
        });

        let session: Option<Session> = serde_json::from_value(body).unwrap();
        let session = session.unwrap();

        assert_eq!(session.user.id, "user-1");
        assert_eq!(session.user.email.as_deref(), Some("dev@example.com"));
        assert!(session.session.unwrap().expires_at.is_some());
    }

    #[test]
    fn anonymous_session_is_null() {
        let session: Option<Session> = serde_json::from_str("null").unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn minimal_session_only_needs_a_user_id() {
        let session: Option<Session> = serde_json::from_str(r#"{"user": {"id": "u-42"}}"#).unwrap();
        assert_eq!(session.unwrap().user.id, "u-42");
    }
}
