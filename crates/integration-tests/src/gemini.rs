use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response, Sse, sse::Event},
    routing::post,
};
use futures::stream;
use regex::Regex;
use tokio::net::TcpListener;

/// Builder for a mock Gemini server.
///
/// The mock speaks the `streamGenerateContent?alt=sse` wire format and
/// records every request body it receives, so tests can assert on the exact
/// prompt the handler sent.
#[derive(Default)]
pub struct GeminiMock {
    plan: Option<serde_json::Value>,
    chunks: Option<Vec<String>>,
    error: Option<(u16, String)>,
}

impl GeminiMock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream the given plan object, split into several SSE chunks.
    ///
    /// The plan's `id` field is replaced with the identifier found in the
    /// prompt, mirroring a model that follows its instructions.
    pub fn with_plan(mut self, plan: serde_json::Value) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Stream exactly these text fragments, no matter what was asked.
    pub fn with_chunks(mut self, chunks: Vec<String>) -> Self {
        self.chunks = Some(chunks);
        self
    }

    /// Refuse every request with the given status and body.
    pub fn with_error(mut self, status: u16, message: impl Into<String>) -> Self {
        self.error = Some((status, message.into()));
        self
    }

    pub async fn spawn(self) -> anyhow::Result<GeminiHandle> {
        let requests = Arc::new(Mutex::new(Vec::new()));

        let state = Arc::new(MockState {
            plan: self.plan,
            chunks: self.chunks,
            error: self.error,
            requests: requests.clone(),
        });

        let app = Router::new()
            .route("/v1beta/models/{*path}", post(generate_content))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock Gemini server failed");
        });

        Ok(GeminiHandle { address, requests })
    }
}

/// A running mock Gemini server.
pub struct GeminiHandle {
    address: SocketAddr,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl GeminiHandle {
    /// Base URL to put into the provider configuration.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.address)
    }

    /// Every request body received so far.
    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().expect("mock mutex poisoned").clone()
    }

    /// The prompt text of every request received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|request| {
                request["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .map(str::to_string)
            })
            .collect()
    }
}

struct MockState {
    plan: Option<serde_json::Value>,
    chunks: Option<Vec<String>>,
    error: Option<(u16, String)>,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn generate_content(
    State(state): State<Arc<MockState>>,
    Path(path): Path<String>,
    Json(request): Json<serde_json::Value>,
) -> Response {
    state
        .requests
        .lock()
        .expect("mock mutex poisoned")
        .push(request.clone());

    if !path.ends_with(":streamGenerateContent") {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Not found"})),
        )
            .into_response();
    }

    if let Some((status, message)) = &state.error {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, message.clone()).into_response();
    }

    let fragments = if let Some(chunks) = &state.chunks {
        chunks.clone()
    } else if let Some(plan) = &state.plan {
        let mut plan = plan.clone();

        if let Some(id) = prompt_plan_id(&request) {
            plan["id"] = serde_json::Value::String(id);
        }

        chunk_text(&plan.to_string(), 4)
    } else {
        vec!["{}".to_string()]
    };

    let events = fragments.into_iter().map(|text| {
        let chunk = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": text}],
                    "role": "model"
                }
            }]
        });

        Ok::<_, Infallible>(Event::default().data(chunk.to_string()))
    });

    Sse::new(stream::iter(events)).into_response()
}

/// The plan identifier the handler embedded in its instructions.
fn prompt_plan_id(request: &serde_json::Value) -> Option<String> {
    let prompt = request["contents"][0]["parts"][0]["text"].as_str()?;

    let pattern = Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").ok()?;

    Some(pattern.find(prompt)?.as_str().to_string())
}

fn chunk_text(text: &str, parts: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let size = chars.len().div_ceil(parts).max(1);

    chars.chunks(size).map(|chunk| chunk.iter().collect()).collect()
}
