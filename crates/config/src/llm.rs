//! Plan generation configuration for the Google Gemini provider.

use std::borrow::Cow;
use std::time::Duration;

use duration_str::deserialize_option_duration;
use secrecy::SecretString;
use serde::Deserialize;

/// Configuration for the plan generation endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// Whether the generation endpoint is enabled.
    enabled: bool,

    /// The path where the generation endpoints will be mounted.
    pub path: Cow<'static, str>,

    /// Google Gemini provider configuration.
    pub google: GoogleConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: Cow::Borrowed("/api"),
            google: GoogleConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Whether the generation endpoint is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

/// Configuration for the Google Gemini API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoogleConfig {
    /// API key for authentication.
    pub api_key: Option<SecretString>,

    /// The model used for plan generation.
    pub model: String,

    /// Custom base URL for the Gemini API.
    pub base_url: Option<String>,

    /// Whether generation is augmented with live search results.
    pub search_grounding: bool,

    /// Request timeout for provider calls.
    #[serde(deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            base_url: None,
            search_grounding: true,
            timeout: None,
        }
    }
}
