// Listings module: the fetch adapter in front of the GenAI client.
// `JobSource` is the seam the board depends on; the production impl builds
// prompts, calls Gemini with search grounding, and hands the raw text to
// the parsing boundary in parse.rs.

pub mod parse;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::genai::{GenAiClient, GenAiError};
use crate::models::job::{JobCategory, JobLanguage, JobListing};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("generation service call failed: {0}")]
    Service(#[from] GenAiError),

    #[error("no parseable JSON in the model response")]
    NoJson,

    #[error("listing JSON did not match the expected shape: {0}")]
    Json(serde_json::Error),
}

/// The board's view of the outside world. Swappable so tests can drive the
/// full request path without a network.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_jobs(
        &self,
        category: JobCategory,
        language: JobLanguage,
    ) -> Result<Vec<JobListing>, FetchError>;

    /// Never fails: any trouble degrades to the fixed fallback line.
    async fn fetch_encouragement(&self) -> String;
}

/// Production source backed by the Gemini client.
pub struct GenAiJobSource {
    client: GenAiClient,
}

impl GenAiJobSource {
    pub fn new(client: GenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobSource for GenAiJobSource {
    async fn fetch_jobs(
        &self,
        category: JobCategory,
        language: JobLanguage,
    ) -> Result<Vec<JobListing>, FetchError> {
        let prompt = prompts::build_jobs_prompt(category, language);
        let raw = self.client.generate(&prompt, true).await?;
        parse::extract_listings(&raw)
    }

    async fn fetch_encouragement(&self) -> String {
        let reply = self.client.generate(prompts::ENCOURAGEMENT_PROMPT, false).await;
        encouragement_or_fallback(reply)
    }
}

/// Trims a successful reply; failed or empty replies become the fixed line.
fn encouragement_or_fallback(reply: Result<String, GenAiError>) -> String {
    match reply {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                prompts::ENCOURAGEMENT_FALLBACK.to_string()
            } else {
                trimmed.to_string()
            }
        }
        Err(e) => {
            warn!("encouragement call failed, serving fallback: {e}");
            prompts::ENCOURAGEMENT_FALLBACK.to_string()
        }
    }
}
