//! Plan generation endpoint.
//!
//! A single route turns a freeform project idea into a structured technology
//! blueprint streamed from Google Gemini. The response body is the raw JSON
//! text as the model produces it; persistence happens after the stream
//! completes, and only for authenticated callers.

use std::{convert::Infallible, sync::Arc};

use auth::{AuthClient, Session};
use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, header},
    response::Response,
    routing::post,
};
use config::LlmConfig;
use futures::{StreamExt, channel::mpsc};
use storage::{NewPlanRecord, PlanStore};
use uuid::Uuid;

mod error;
mod prompt;
mod provider;
mod schema;

use error::LlmError;
use provider::{PlanStream, google::GoogleProvider};

pub use schema::{
    Architecture, BestPractices, Complexity, Difficulty, LearningPath, Phase, ProjectContext, ProjectPlan, Resource,
    Risk, Roadmap, TechChoice,
};

pub(crate) type Result<T> = std::result::Result<T, LlmError>;

/// Creates an axum router for the plan generation endpoint.
pub async fn router(
    config: LlmConfig,
    store: Arc<dyn PlanStore>,
    auth: Arc<AuthClient>,
) -> anyhow::Result<Router> {
    let server = Arc::new(
        PlanServer::new(config.clone(), store, auth)
            .map_err(|e| anyhow::anyhow!("Failed to initialize plan generation: {e}"))?,
    );

    let api_routes = Router::new().route("/plans", post(generate_plan)).with_state(server);

    Ok(Router::new().nest(&config.path, api_routes))
}

struct PlanServer {
    provider: GoogleProvider,
    store: Arc<dyn PlanStore>,
    auth: Arc<AuthClient>,
}

impl PlanServer {
    fn new(config: LlmConfig, store: Arc<dyn PlanStore>, auth: Arc<AuthClient>) -> Result<Self> {
        let provider = GoogleProvider::new(config.google)?;

        Ok(Self { provider, store, auth })
    }
}

/// Handle a plan generation request.
///
/// The body is any JSON value describing the project idea. The response is a
/// plain-text stream of the plan object's JSON serialization, flushed as the
/// provider produces it. Failures after the first byte has been committed are
/// logged only; failures before that return a 500 with an error body.
async fn generate_plan(
    State(server): State<Arc<PlanServer>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    // A missing session is not an error. Generation proceeds unauthenticated
    // and persistence is skipped at completion.
    let session = match server.auth.session(&headers).await {
        Ok(session) => session,
        Err(e) => {
            log::warn!("Session lookup failed, continuing unauthenticated: {e}");
            None
        }
    };

    // Allocated before the generation call so the identifier can be embedded
    // in the instructions and appear inside the generated content itself.
    let plan_id = Uuid::new_v4();

    let idea: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| LlmError::InvalidRequest(format!("Request body is not valid JSON: {e}")))?;

    let idea_text = idea_text(&idea);

    log::info!("Received project idea: {idea_text}");

    let prompt = prompt::technology_advisor(&idea_text, plan_id);
    let stream = server.provider.stream_plan(&prompt).await?;

    let (tx, rx) = mpsc::unbounded();

    tokio::spawn(pump(stream, tx, server.clone(), session, idea_text, plan_id));

    let body = Body::from_stream(rx.map(Ok::<_, Infallible>));

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(body)
        .map_err(|e| {
            log::error!("Failed to build streaming response: {e}");
            LlmError::InternalError(None)
        })
}

/// The idea text as it flows into the prompt and the persisted row.
///
/// Any JSON shape is accepted; a string is used verbatim, everything else is
/// stringified with compact JSON serialization.
fn idea_text(idea: &serde_json::Value) -> String {
    match idea.as_str() {
        Some(idea) => idea.to_string(),
        None => idea.to_string(),
    }
}

/// Drive the provider stream to completion.
///
/// Text fragments are forwarded to the client as they arrive and accumulated
/// for the completion step: schema validation, then a single insert when the
/// caller had a session. Nothing in here can reach the client anymore; every
/// failure is log-only.
async fn pump(
    mut stream: PlanStream,
    tx: mpsc::UnboundedSender<Bytes>,
    server: Arc<PlanServer>,
    session: Option<Session>,
    idea_text: String,
    plan_id: Uuid,
) {
    let mut accumulated = String::new();
    let mut forwarding = true;

    while let Some(fragment) = stream.next().await {
        match fragment {
            Ok(text) => {
                accumulated.push_str(&text);

                if forwarding && tx.unbounded_send(Bytes::from(text)).is_err() {
                    // Client went away. Keep draining so a valid plan can
                    // still be persisted.
                    log::debug!("Client disconnected, continuing generation for plan {plan_id}");
                    forwarding = false;
                }
            }
            Err(e) => {
                log::error!("Generation error: {e}");
                return;
            }
        }
    }

    let plan: ProjectPlan = match serde_json::from_str(&accumulated) {
        Ok(plan) => plan,
        Err(e) => {
            log::error!("Schema validation error: {e}");
            return;
        }
    };

    let Some(session) = session else {
        log::info!("User not authenticated, skipping database save");
        return;
    };

    let generated_content = match serde_json::to_value(&plan) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Failed to serialize validated plan: {e}");
            return;
        }
    };

    let record = NewPlanRecord {
        id: plan_id,
        user_id: session.user.id,
        generated_content,
        project_idea: idea_text,
    };

    if let Err(e) = server.store.insert_plan(record).await {
        log::error!("Failed to save plan to database: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::idea_text;

    #[test]
    fn string_idea_is_used_verbatim() {
        let idea: serde_json::Value = serde_json::from_str(r#""A recipe-sharing mobile app""#).unwrap();

        assert_eq!(idea_text(&idea), "A recipe-sharing mobile app");
    }

    #[test]
    fn non_string_idea_is_stringified() {
        let idea: serde_json::Value = serde_json::from_str(r#"{"idea": "a game", "platform": "web"}"#).unwrap();

        assert_eq!(idea_text(&idea), r#"{"idea":"a game","platform":"web"}"#);
    }

    #[test]
    fn numeric_idea_is_stringified() {
        let idea: serde_json::Value = serde_json::from_str("42").unwrap();

        assert_eq!(idea_text(&idea), "42");
    }
}
