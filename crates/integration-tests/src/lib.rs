//! Test harness for black-box tests against a running Planforge server.
//!
//! The harness assembles the real plan generation router with an in-memory
//! plan store and points the provider and auth clients at mock servers, then
//! serves the whole thing on an ephemeral port.

mod auth_service;
mod gemini;
mod store;

use std::{net::SocketAddr, sync::Arc};

use auth::AuthClient;
use config::Config;
use indoc::formatdoc;
use storage::PlanStore;
use tokio::net::TcpListener;

pub use auth_service::{AuthHandle, AuthMock};
pub use gemini::{GeminiHandle, GeminiMock};
pub use store::InMemoryPlanStore;

/// A running Planforge server wired to test doubles.
pub struct TestServer {
    address: SocketAddr,
    client: reqwest::Client,
    /// The store behind the server, for asserting on writes.
    pub store: Arc<InMemoryPlanStore>,
}

impl TestServer {
    pub fn builder() -> TestServerBuilder {
        TestServerBuilder {
            google_base_url: None,
            auth_base_url: None,
            store: None,
        }
    }

    /// POST a raw body to the plan endpoint, optionally with a `Cookie`.
    pub async fn post_plan(&self, body: impl Into<String>, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("http://{}/api/plans", self.address))
            .header("content-type", "application/json")
            .body(body.into());

        if let Some(cookie) = cookie {
            request = request.header("cookie", cookie);
        }

        request.send().await.expect("request to test server failed")
    }
}

/// Builder for [`TestServer`].
pub struct TestServerBuilder {
    google_base_url: Option<String>,
    auth_base_url: Option<String>,
    store: Option<Arc<InMemoryPlanStore>>,
}

impl TestServerBuilder {
    /// Point the provider at a mock Gemini server.
    pub fn gemini(mut self, gemini: &GeminiHandle) -> Self {
        self.google_base_url = Some(gemini.base_url());
        self
    }

    /// Point the auth client at a mock auth service.
    pub fn auth(mut self, auth: &AuthHandle) -> Self {
        self.auth_base_url = Some(auth.base_url());
        self
    }

    /// Use a specific store double instead of a fresh empty one.
    pub fn store(mut self, store: Arc<InMemoryPlanStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn build(self) -> TestServer {
        let store = self.store.unwrap_or_default();

        let google_base_url = self.google_base_url.expect("a Gemini mock is required");
        let auth_base_url = self
            .auth_base_url
            .unwrap_or_else(|| "http://127.0.0.1:9/".to_string());

        let config_str = formatdoc! {r#"
            [llm.google]
            api_key = "test-key"
            base_url = "{google_base_url}"

            [auth]
            base_url = "{auth_base_url}"
        "#};

        let config: Config = toml::from_str(&config_str).expect("test config is valid");

        let auth_client = Arc::new(AuthClient::new(&config.auth).expect("auth client from test config"));

        let app = llm::router(config.llm, store.clone() as Arc<dyn PlanStore>, auth_client)
            .await
            .expect("plan router from test config");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("ephemeral port");
        let address = listener.local_addr().expect("listener address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        TestServer {
            address,
            client: reqwest::Client::new(),
            store,
        }
    }
}

/// A plan object the mock streams back, shaped like a real generation.
///
/// The `id` is a placeholder; the mock replaces it with the identifier it
/// finds in the prompt.
pub fn sample_plan() -> serde_json::Value {
    serde_json::json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "name": "DishSwap",
        "description": "A mobile app for sharing and discovering recipes.",
        "category": "Mobile App",
        "complexity": "Moderate",
        "context": {
            "teamSize": "2-3 developers",
            "experienceLevel": "Intermediate",
            "timeline": "3-4 months",
            "budget": "Low, open-source preferred"
        },
        "techStack": [{
            "name": "React Native",
            "role": "frontend",
            "reasoning": "One codebase for iOS and Android.",
            "alternatives": ["Flutter"],
            "difficulty": "Intermediate",
            "benefits": ["Large ecosystem"],
            "community": "Very active",
            "cost": "Free and open source"
        }],
        "architecture": {
            "pattern": "Client-server",
            "description": "Mobile client talking to a REST API.",
            "integrations": "None required initially."
        },
        "phases": [{"name": "MVP", "description": "Recipe feed and upload."}],
        "learningPath": {
            "prerequisites": ["JavaScript"],
            "studyOrder": ["React", "React Native"],
            "learningCurve": "A few weeks for an intermediate team."
        },
        "bestPractices": {
            "development": ["Use TypeScript"],
            "security": ["Validate uploads"],
            "testing": ["Jest"],
            "performance": ["Image compression"]
        },
        "risks": [{"risk": "App store review delays", "mitigation": "Submit early."}],
        "resources": [{
            "title": "React Native docs",
            "description": "Official getting started guide.",
            "url": "https://reactnative.dev/docs/getting-started"
        }],
        "roadmap": {
            "gettingStarted": "Scaffold with Expo.",
            "foundation": "Navigation and auth screens.",
            "coreDevelopment": "Recipe CRUD and feed.",
            "integration": "Push notifications.",
            "testing": "Component and e2e tests.",
            "deployment": "App store releases.",
            "challenges": ["Offline support"],
            "enhancements": ["Social features"]
        }
    })
}
