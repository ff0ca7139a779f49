//! Parsing boundary for model output: raw text in, typed listings or a
//! typed failure out. No other module inspects raw model text.

use uuid::Uuid;

use crate::listings::FetchError;
use crate::models::job::JobListing;

/// Extracts the job list from a raw model reply.
///
/// The first ```json fenced block wins. A fence containing broken JSON is a
/// hard [`FetchError::Json`], never a fallback to other text. Only when no
/// fence exists at all is the whole reply tried as bare JSON.
pub fn extract_listings(raw: &str) -> Result<Vec<JobListing>, FetchError> {
    let mut jobs = match fenced_json_block(raw) {
        Some(block) => {
            serde_json::from_str::<Vec<JobListing>>(block).map_err(FetchError::Json)?
        }
        None => serde_json::from_str::<Vec<JobListing>>(raw.trim())
            .map_err(|_| FetchError::NoJson)?,
    };

    // Ids are the dedup key downstream; a model that forgets them should
    // not sink the whole batch.
    for job in &mut jobs {
        if job.id.trim().is_empty() {
            job.id = Uuid::new_v4().to_string();
        }
    }

    Ok(jobs)
}

/// Returns the body of the first ```json fenced block, if any.
fn fenced_json_block(raw: &str) -> Option<&str> {
    let start = raw.find("```json")? + "```json".len();
    let rest = &raw[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}
