//! Gemini `generateContent` correction backend.

use crate::core::config::CorrectionConfig;
use crate::core::corrector::Corrector;
use crate::core::error::{QuizmillError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Env var overriding the API base URL (tests point it at a local
/// server)
const BASE_URL_ENV: &str = "QUIZMILL_GEMINI_BASE_URL";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Instructional preamble sent with every chunk. The chunk text is
/// appended below it.
const CORRECTION_PROMPT: &str = "\
Please correct and format the following quiz data. Each question must follow this exact format:

Question text here?
A. Option A
B. Option B
C. Option C
D. Option D;;CORRECT_ANSWER

Rules for correction:
1. Fix any formatting issues (missing separators, malformed options)
2. Ensure each question has at least 4 options (A, B, C, D, E, ...)
3. Ensure each question has a correct answer marked with ;;
4. Remove any duplicate content or metadata
5. Fix any obvious OCR errors in the text
6. Ensure proper spacing and line breaks
7. Keep the original meaning and content intact
8. If a question is missing an answer, mark it as ;;? for manual review
9. Remove any text that appears to be navigation, headers, or footers
10. Separate each question-and-answer pair with a blank line
11. If an answer has additional context or explanation, format it as: ;;ANSWER (explanation)
12. For example: ;;A (this is the fundamental principle) or ;;C (standard definition)

Please return only the corrected quiz data in the specified format, nothing else.

Original content:
";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Corrector backed by the Gemini REST API.
pub struct GeminiCorrector {
    client: reqwest::Client,
    model: String,
    api_key: String,
    base_url: String,
}

impl GeminiCorrector {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let base_url =
            env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            model: model.into(),
            api_key: api_key.into(),
            base_url,
        })
    }

    /// Build a corrector from config, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &CorrectionConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            QuizmillError::ConfigError(format!(
                "API key not found: set the {} environment variable",
                config.api_key_env
            ))
        })?;
        Self::new(config.model.clone(), api_key)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Corrector for GeminiCorrector {
    async fn correct(&self, chunk_text: &str) -> Result<String> {
        let prompt = format!("{CORRECTION_PROMPT}{chunk_text}");
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuizmillError::ServiceError(format!(
                "Gemini returned {status}: {body}"
            )));
        }

        let data: GenerateContentResponse = response.json().await?;
        match extract_text(&data) {
            Some(text) => Ok(text),
            None => Err(QuizmillError::ServiceError(
                "Empty response from Gemini".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// First candidate's text, trimmed; `None` when absent or blank.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let text = response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .first()?
        .text
        .trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_states_record_grammar() {
        assert!(CORRECTION_PROMPT.contains(";;CORRECT_ANSWER"));
        assert!(CORRECTION_PROMPT.contains(";;?"));
        assert!(CORRECTION_PROMPT.contains("at least 4 options"));
        assert!(CORRECTION_PROMPT.contains(";;ANSWER (explanation)"));
        assert!(CORRECTION_PROMPT.contains("blank line"));
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_extract_text_from_response() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "  corrected text\n"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(&response).as_deref(), Some("corrected text"));
    }

    #[test]
    fn test_blank_candidate_is_none() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn test_missing_candidates_is_none() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn test_endpoint_uses_model() {
        let corrector = GeminiCorrector::new("gemini-2.0-flash", "key").unwrap();
        assert!(corrector
            .endpoint()
            .ends_with("/v1beta/models/gemini-2.0-flash:generateContent"));
    }
}
