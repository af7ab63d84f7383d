use serde::Deserialize;

/// A streamed chunk from the Gemini `streamGenerateContent` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct GoogleStreamChunk {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GoogleCandidate {
    #[serde(default)]
    content: Option<GoogleCandidateContent>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GoogleCandidateContent {
    #[serde(default)]
    parts: Vec<GoogleCandidatePart>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GoogleCandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GoogleStreamChunk {
    /// Concatenated text of all candidate parts, or `None` for chunks that
    /// carry no text (safety metadata, usage counts).
    pub(super) fn text(self) -> Option<String> {
        let mut out = String::new();

        for candidate in self.candidates {
            let Some(content) = candidate.content else {
                continue;
            };

            for part in content.parts {
                if let Some(text) = part.text {
                    out.push_str(&text);
                }
            }
        }

        (!out.is_empty()).then_some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::GoogleStreamChunk;

    #[test]
    fn chunk_text_is_extracted() {
        let chunk: GoogleStreamChunk = sonic_rs::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"name\":"},{"text":"\"DishSwap\""}],"role":"model"}}]}"#,
        )
        .unwrap();

        assert_eq!(chunk.text().as_deref(), Some(r#"{"name":"DishSwap""#));
    }

    #[test]
    fn metadata_only_chunk_has_no_text() {
        let chunk: GoogleStreamChunk =
            sonic_rs::from_str(r#"{"usageMetadata":{"promptTokenCount":12,"candidatesTokenCount":512}}"#).unwrap();

        assert!(chunk.text().is_none());
    }
}
