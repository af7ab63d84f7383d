mod input;
mod output;

use std::time::Duration;

use config::GoogleConfig;
use reqwest::Client;
use secrecy::ExposeSecret;

use self::{input::GoogleGenerateRequest, output::GoogleStreamChunk};

use eventsource_stream::Eventsource;
use futures::StreamExt;

use crate::{error::LlmError, provider::PlanStream, schema};

const DEFAULT_GOOGLE_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) struct GoogleProvider {
    client: Client,
    base_url: String,
    config: GoogleConfig,
    response_schema: serde_json::Value,
}

impl GoogleProvider {
    pub(crate) fn new(config: GoogleConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| {
                log::error!("Failed to create HTTP client for Google provider: {e}");
                LlmError::InternalError(None)
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GOOGLE_API_URL.to_string());

        Ok(Self {
            client,
            base_url,
            config,
            response_schema: schema::response_schema(),
        })
    }

    /// Stream a plan generation constrained to the plan schema.
    ///
    /// Returns a stream of text fragments that concatenate to the serialized
    /// plan object. A request the provider refuses before any body bytes
    /// arrive is an error here; mid-stream problems are logged and end the
    /// stream early.
    pub(crate) async fn stream_plan(&self, prompt: &str) -> crate::Result<PlanStream> {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            LlmError::AuthenticationFailed("No API key configured for the Google provider".to_string())
        })?;

        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url,
            self.config.model,
            api_key.expose_secret()
        );

        let google_request =
            GoogleGenerateRequest::structured(prompt, self.response_schema.clone(), self.config.search_grounding);

        let response = self
            .client
            .post(&url)
            .json(&google_request)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionError(format!("Failed to send streaming request to Google: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Google streaming API error ({status}): {error_text}");

            return Err(match status.as_u16() {
                401 => LlmError::AuthenticationFailed(error_text),
                403 => LlmError::InsufficientQuota(error_text),
                404 => LlmError::ModelNotFound(error_text),
                429 => LlmError::RateLimitExceeded { message: error_text },
                400 => LlmError::InvalidRequest(error_text),
                500 => LlmError::InternalError(Some(error_text)),
                _ => LlmError::ProviderApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        // Convert response bytes stream to SSE event stream
        let byte_stream = response.bytes_stream();
        let event_stream = byte_stream.eventsource();

        let chunk_stream = event_stream.filter_map(|event| async move {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    log::error!("SSE error in Google stream: {e}");
                    return None;
                }
            };

            let Ok(chunk) = sonic_rs::from_str::<GoogleStreamChunk>(&event.data) else {
                log::warn!("Failed to parse Google streaming chunk: {}", event.data);
                return None;
            };

            chunk.text().map(Ok)
        });

        Ok(Box::pin(chunk_stream))
    }
}
