// All prompt constants for the listings module.
// The wording is part of the service contract: the model is told to answer
// with one fenced JSON array, and parse.rs holds it to exactly that.

use crate::models::job::{JobCategory, JobLanguage};

/// Listing request template. Replace `{category}` and `{language}` before
/// sending. Asks for a fenced ```json array with the full record field set.
pub const JOBS_PROMPT_TEMPLATE: &str = r#"Using Google Search, find 12 real, remote, entry-level or mid-level job listings for the category "{category}" targeting {language} speakers, posted within the last month, from popular job sites like LinkedIn, Indeed, etc.
    The datePosted should be the actual date the job was posted, in 'YYYY-MM-DD' format.
    The output MUST be a single, valid JSON array of job objects, enclosed in a markdown code block (```json ... ```).
    Each job object must include: a unique 'id' (can be a generated UUID), 'title', 'company', 'description' (a 1-2 sentence summary), 'datePosted', 'location' (can be 'Remote' or a specific city if mentioned), 'language', 'category', and the direct 'url' to the job posting.
    Do not include any text outside of the JSON markdown block."#;

/// Fixed prompt for the encouragement call. No grounding, no placeholders.
pub const ENCOURAGEMENT_PROMPT: &str = "Generate a single, short, encouraging quotation \
    for someone in the middle of a job search. Include an attribution naming its author \
    or source (e.g., Samuel Beckett). The response should be ONLY the quotation text and \
    its attribution. Do not include any other text, explanation, or markdown formatting.";

/// Served whenever the encouragement call fails or returns nothing.
pub const ENCOURAGEMENT_FALLBACK: &str = "Fall seven times, stand up eight. - Japanese proverb";

/// Builds the listing request prompt for one category/language pair.
pub fn build_jobs_prompt(category: JobCategory, language: JobLanguage) -> String {
    JOBS_PROMPT_TEMPLATE
        .replace("{category}", category.as_str())
        .replace("{language}", language.as_str())
}
