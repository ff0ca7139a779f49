use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Listing categories the board can request from the generation service.
/// Serialized names double as the literal strings sent in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobCategory {
    AI,
    IT,
    Marketing,
    Web3,
    SEO,
}

impl JobCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobCategory::AI => "AI",
            JobCategory::IT => "IT",
            JobCategory::Marketing => "Marketing",
            JobCategory::Web3 => "Web3",
            JobCategory::SEO => "SEO",
        }
    }
}

/// Target audience for a listing request. The board exposes this as a
/// boolean toggle, so both representations live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobLanguage {
    English,
    Russian,
}

impl JobLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobLanguage::English => "English",
            JobLanguage::Russian => "Russian",
        }
    }

    pub fn from_russian(russian: bool) -> Self {
        if russian {
            JobLanguage::Russian
        } else {
            JobLanguage::English
        }
    }
}

/// A job posting as produced by the generation service.
///
/// Field names follow the model-output wire contract: camelCase keys and
/// `datePosted` as a `YYYY-MM-DD` string. There is deliberately no `applied`
/// field on this shape; application tracking exists only on [`SavedJob`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    /// Identity key for dedup and lookups. The parsing boundary fills this
    /// with a generated UUID when the model omits it.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub date_posted: NaiveDate,
    pub location: String,
    pub language: JobLanguage,
    pub category: JobCategory,
    pub url: String,
}

/// A listing the user kept. `applied` always starts `false`: the constructor
/// is the only way to build one from a fetched record, and the wire shape of
/// [`JobListing`] cannot smuggle the flag in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedJob {
    #[serde(flatten)]
    pub listing: JobListing,
    #[serde(default)]
    pub applied: bool,
}

impl SavedJob {
    pub fn new(listing: JobListing) -> Self {
        Self {
            listing,
            applied: false,
        }
    }
}
