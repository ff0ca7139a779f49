/// GenAI client — the single point of entry for all generation-service calls.
///
/// ARCHITECTURAL RULE: no other module may call the Gemini API directly.
/// Listings and encouragement both go through [`GenAiClient::generate`].
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GENAI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used when `GENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// `{"google_search": {}}` — attaches Google Search grounding to a call.
#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate. Search-grounded
    /// replies often split their text across several parts.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenAiApiError {
    error: GenAiApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GenAiApiErrorBody {
    message: String,
}

/// Typed wrapper over the Gemini `generateContent` REST endpoint.
///
/// One attempt per call: retry policy belongs to the caller, and the board
/// surfaces failures to the user instead of retrying behind their back.
#[derive(Clone)]
pub struct GenAiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GenAiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    /// Sends `prompt` to the model and returns the raw response text.
    /// `grounded` attaches the Google Search tool to the call.
    pub async fn generate(&self, prompt: &str, grounded: bool) -> Result<String, GenAiError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            tools: grounded.then(|| {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            }),
        };

        let url = format!("{GENAI_API_BASE}/{}:generateContent", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the structured error message
            let message = serde_json::from_str::<GenAiApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenAiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.text().ok_or(GenAiError::EmptyContent)?;

        debug!(
            "GenAI call succeeded: model={}, grounded={}, chars={}",
            self.model,
            grounded,
            text.len()
        );

        Ok(text)
    }
}
