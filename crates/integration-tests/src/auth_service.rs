use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;

/// Builder for a mock auth service.
///
/// Answers the session endpoint the way the real auth service does: a JSON
/// session envelope for recognized credentials, a JSON `null` for everyone
/// else. Credentials are matched against the forwarded `Cookie` header.
#[derive(Default)]
pub struct AuthMock {
    sessions: HashMap<String, String>,
}

impl AuthMock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognize the given `Cookie` header value as the given user.
    pub fn with_session(mut self, cookie: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.sessions.insert(cookie.into(), user_id.into());
        self
    }

    pub async fn spawn(self) -> anyhow::Result<AuthHandle> {
        let state = Arc::new(self.sessions);

        let app = Router::new()
            .route("/api/auth/get-session", get(get_session))
            .route("/api/auth/sign-in/email", post(sign_in_email))
            .route("/api/auth/sign-out", post(sign_out))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock auth server failed");
        });

        Ok(AuthHandle { address })
    }
}

/// A running mock auth service.
pub struct AuthHandle {
    address: SocketAddr,
}

impl AuthHandle {
    /// Base URL to put into the auth configuration.
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.address)
    }
}

async fn get_session(
    State(sessions): State<Arc<HashMap<String, String>>>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let cookie = headers.get(header::COOKIE).and_then(|value| value.to_str().ok());

    let Some(user_id) = cookie.and_then(|cookie| sessions.get(cookie)) else {
        return Json(serde_json::Value::Null);
    };

    Json(json!({
        "session": {
            "token": "test-session-token",
            "expiresAt": "2027-01-01T00:00:00.000Z"
        },
        "user": {
            "id": user_id,
            "email": "dev@example.com",
            "name": "Dev"
        }
    }))
}

async fn sign_in_email(Json(body): Json<serde_json::Value>) -> Response {
    if body["email"] != "dev@example.com" || body["password"] != "hunter2" {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid email or password"}))).into_response();
    }

    Json(json!({
        "token": "test-session-token",
        "user": {
            "id": "user-1",
            "email": "dev@example.com",
            "name": "Dev"
        }
    }))
    .into_response()
}

async fn sign_out() -> Json<serde_json::Value> {
    Json(json!({"success": true}))
}
