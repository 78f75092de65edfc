use std::fmt;

use engine_logging::item_log;
use leafcheck_core::{AnalysisResult, ItemId};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt::{response_schema, DIAGNOSIS_PROMPT};
use crate::NormalizedPayload;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct AnalysisSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
        }
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for AnalysisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisSettings")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no response text returned")]
    EmptyResponse,
    #[error("response is not a valid report: {0}")]
    Malformed(String),
}

#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        item_id: ItemId,
        payload: &NormalizedPayload,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// Analyzer backed by the Gemini `generateContent` endpoint with structured
/// JSON output.
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    settings: AnalysisSettings,
    client: reqwest::Client,
}

impl GeminiAnalyzer {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait::async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        item_id: ItemId,
        payload: &NormalizedPayload,
    ) -> Result<AnalysisResult, AnalysisError> {
        let body = serde_json::to_vec(&build_request(payload))
            .map_err(|err| AnalysisError::Transport(err.to_string()))?;
        item_log!(
            Debug,
            item_id,
            "POST {} mime_type={} payload_b64_len={}",
            self.url(),
            payload.mime_type,
            payload.data.len()
        );

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.settings.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| AnalysisError::Transport(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| AnalysisError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let report_text = extract_response_text(&text)?;
        item_log!(Trace, item_id, "report text: {}", report_text);
        parse_report(&report_text)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        data: &'a str,
    },
    Text(&'static str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

fn build_request(payload: &NormalizedPayload) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                Part::InlineData {
                    mime_type: &payload.mime_type,
                    data: &payload.data,
                },
                Part::Text(DIAGNOSIS_PROMPT),
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn extract_response_text(body: &str) -> Result<String, AnalysisError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|err| AnalysisError::Malformed(err.to_string()))?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(text)
}

fn parse_report(text: &str) -> Result<AnalysisResult, AnalysisError> {
    serde_json::from_str(text.trim()).map_err(|err| AnalysisError::Malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_wire_shape() {
        let payload = NormalizedPayload {
            data: "QUJD".to_string(),
            mime_type: "image/jpeg".to_string(),
        };
        let value = serde_json::to_value(build_request(&payload)).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert_eq!(parts[1]["text"], DIAGNOSIS_PROMPT);
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            value["generationConfig"]["responseSchema"]["type"],
            "OBJECT"
        );
    }

    #[test]
    fn text_parts_are_concatenated() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#;
        assert_eq!(extract_response_text(body).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        assert_eq!(
            extract_response_text(r#"{"candidates":[]}"#),
            Err(AnalysisError::EmptyResponse)
        );
        assert_eq!(
            extract_response_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(AnalysisError::EmptyResponse)
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let settings = AnalysisSettings {
            api_key: "secret-key".to_string(),
            ..AnalysisSettings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret-key"));
    }
}
