use serde::Serialize;

/// Request body for the Google Gemini GenerateContent API.
///
/// Only the fields Planforge exercises are modeled; see the
/// [Google AI API Reference](https://ai.google.dev/api/generate-content)
/// for the full surface.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GoogleGenerateRequest {
    /// The content of the current conversation with the model.
    pub(super) contents: Vec<GoogleContent>,

    /// Configuration for model generation and output.
    pub(super) generation_config: GoogleGenerationConfig,

    /// Tool configurations. Planforge only ever requests the provider-side
    /// search tool, used to ground recommendations in current information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) tools: Option<Vec<GoogleTool>>,
}

impl GoogleGenerateRequest {
    /// Build a single-turn request constrained to a JSON response schema.
    pub(super) fn structured(prompt: &str, response_schema: serde_json::Value, search_grounding: bool) -> Self {
        let contents = vec![GoogleContent {
            parts: vec![GooglePart {
                text: prompt.to_string(),
            }],
            role: GoogleRole::User,
        }];

        let generation_config = GoogleGenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(response_schema),
            candidate_count: Some(1),
            temperature: None,
            max_output_tokens: None,
        };

        let tools = search_grounding.then(|| {
            vec![GoogleTool {
                google_search: GoogleSearch {},
            }]
        });

        Self {
            contents,
            generation_config,
            tools,
        }
    }
}

/// A single piece of conversation content.
#[derive(Debug, Serialize)]
pub(super) struct GoogleContent {
    pub(super) parts: Vec<GooglePart>,
    pub(super) role: GoogleRole,
}

/// A text part of a content entry.
#[derive(Debug, Serialize)]
pub(super) struct GooglePart {
    pub(super) text: String,
}

/// Conversation role as Google names them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum GoogleRole {
    User,
}

/// Configuration options for model generation and output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GoogleGenerationConfig {
    /// MIME type of the generated candidate text. `application/json`
    /// switches the model into structured output mode.
    pub(super) response_mime_type: Option<String>,

    /// Output schema of the generated candidate text when the MIME type is
    /// `application/json`.
    pub(super) response_schema: Option<serde_json::Value>,

    /// Number of generated responses to return. Only 1 is supported.
    pub(super) candidate_count: Option<i32>,

    /// Controls randomness in generation.
    pub(super) temperature: Option<f32>,

    /// The maximum number of tokens to include in a candidate.
    pub(super) max_output_tokens: Option<i32>,
}

/// A tool the model may use while generating.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GoogleTool {
    /// Provider-side search grounding.
    pub(super) google_search: GoogleSearch,
}

/// Marker for the provider-side search tool; it takes no configuration.
#[derive(Debug, Serialize)]
pub(super) struct GoogleSearch {}
