// The board owns both job collections and every filter, decides when a
// fetch is warranted, and derives the one list the presentation layer
// shows. All mutation goes through the intent methods here; handlers only
// translate HTTP into them.

pub mod derive;
pub mod handlers;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::listings::FetchError;
use crate::models::job::{JobCategory, JobLanguage, JobListing, SavedJob};

/// Which collection feeds the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Search,
    Saved,
}

/// The filter values captured at the moment a fetch is issued. A resolved
/// fetch whose tag no longer matches the current filters is discarded
/// wholesale, so a late reply to a superseded request can never clobber the
/// user's latest intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTag {
    pub category: JobCategory,
    pub language: JobLanguage,
}

/// One derived row: the record plus its presentation flags.
#[derive(Debug, Clone, Serialize)]
pub struct JobCard {
    #[serde(flatten)]
    pub listing: JobListing,
    /// Present only for rows drawn from the saved collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,
    pub saved: bool,
}

/// Everything the presentation layer renders, recomputed on every request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub jobs: Vec<JobCard>,
    pub view: View,
    pub category: JobCategory,
    pub russian: bool,
    pub search_term: String,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub saved_count: usize,
}

pub struct JobBoard {
    fetched: Vec<JobListing>,
    saved: Vec<SavedJob>,
    view: View,
    category: JobCategory,
    russian: bool,
    search_term: String,
    /// Tag of the in-flight fetch, if any. Drives the `loading` flag.
    pending: Option<FetchTag>,
    /// Tag of the most recently issued fetch, resolved or not. Guards
    /// against re-fetching filters that were already attempted, which is
    /// what keeps failures from turning into automatic retry loops.
    last_attempt: Option<FetchTag>,
    /// User-visible message from the last failed fetch for the current tag.
    error: Option<String>,
}

impl JobBoard {
    pub fn new(saved: Vec<SavedJob>) -> Self {
        Self {
            fetched: Vec::new(),
            saved,
            view: View::Search,
            category: JobCategory::AI,
            russian: false,
            search_term: String::new(),
            pending: None,
            last_attempt: None,
            error: None,
        }
    }

    fn current_tag(&self) -> FetchTag {
        FetchTag {
            category: self.category,
            language: JobLanguage::from_russian(self.russian),
        }
    }

    /// Marks a fetch as issued for the current filters. Every trigger path
    /// funnels through here so the loading/error flags and the supersession
    /// bookkeeping stay in one place.
    fn begin_fetch(&mut self) -> FetchTag {
        let tag = self.current_tag();
        self.pending = Some(tag);
        self.last_attempt = Some(tag);
        self.error = None;
        tag
    }

    /// Applies a resolved fetch. A stale tag is dropped without touching
    /// anything except the loading flag. A failure for the current tag
    /// keeps the previous listings visible and records the message.
    pub fn complete_fetch(&mut self, tag: FetchTag, result: Result<Vec<JobListing>, FetchError>) {
        if self.pending == Some(tag) {
            self.pending = None;
        }
        if tag != self.current_tag() {
            return;
        }

        match result {
            Ok(jobs) => {
                self.fetched = jobs;
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
    }

    /// Category selector. Returns the tag to fetch when the change warrants
    /// a new request (never while the saved view is active, never when the
    /// value did not change).
    pub fn set_category(&mut self, category: JobCategory) -> Option<FetchTag> {
        if self.category == category {
            return None;
        }
        self.category = category;
        (self.view == View::Search).then(|| self.begin_fetch())
    }

    /// Language toggle with the same contract as `set_category`.
    pub fn set_language(&mut self, russian: bool) -> Option<FetchTag> {
        if self.russian == russian {
            return None;
        }
        self.russian = russian;
        (self.view == View::Search).then(|| self.begin_fetch())
    }

    /// Switches the active view. Entering the search view refetches only if
    /// the current filters were never attempted, so flipping back and forth
    /// does not hammer the service.
    pub fn set_view(&mut self, view: View) -> Option<FetchTag> {
        if self.view == view {
            return None;
        }
        self.view = view;
        self.ensure_fresh()
    }

    /// Purely local: the derived view recomputes, nothing is fetched.
    pub fn set_search_term(&mut self, term: String) {
        self.search_term = term;
    }

    /// Explicit retry affordance for the current filters.
    pub fn refresh(&mut self) -> Option<FetchTag> {
        (self.view == View::Search).then(|| self.begin_fetch())
    }

    /// Lazy initial fetch: fires only in the search view and only when the
    /// current filters have never been attempted. Serving snapshots through
    /// this cannot retry a failed fetch behind the user's back.
    pub fn ensure_fresh(&mut self) -> Option<FetchTag> {
        if self.view == View::Search && self.last_attempt != Some(self.current_tag()) {
            return Some(self.begin_fetch());
        }
        None
    }

    /// Appends a copy of `listing` with `applied` reset to false, unless
    /// that id is already saved. Returns whether the collection changed.
    pub fn save_job(&mut self, listing: JobListing) -> bool {
        if self.saved.iter().any(|j| j.listing.id == listing.id) {
            return false;
        }
        self.saved.push(SavedJob::new(listing));
        true
    }

    /// Removes the saved record with `id`. Absent ids are a no-op.
    pub fn remove_job(&mut self, id: &str) -> bool {
        let before = self.saved.len();
        self.saved.retain(|j| j.listing.id != id);
        self.saved.len() != before
    }

    /// Flips the applied flag on the saved record with `id`, if present.
    pub fn toggle_applied(&mut self, id: &str) -> bool {
        match self.saved.iter_mut().find(|j| j.listing.id == id) {
            Some(job) => {
                job.applied = !job.applied;
                true
            }
            None => false,
        }
    }

    /// Insertion-ordered saved collection, as persisted.
    pub fn saved(&self) -> &[SavedJob] {
        &self.saved
    }

    /// Derives the full presentation state from the current collections and
    /// filters. Never mutates; two calls without an intervening intent
    /// produce identical snapshots.
    pub fn snapshot(&self) -> BoardSnapshot {
        let jobs = match self.view {
            View::Search => {
                let saved_ids: HashSet<&str> =
                    self.saved.iter().map(|j| j.listing.id.as_str()).collect();
                derive::derive_search_view(&self.fetched, &self.search_term)
                    .into_iter()
                    .map(|listing| JobCard {
                        saved: saved_ids.contains(listing.id.as_str()),
                        applied: None,
                        listing,
                    })
                    .collect()
            }
            View::Saved => derive::derive_saved_view(&self.saved, &self.search_term)
                .into_iter()
                .map(|job| JobCard {
                    applied: Some(job.applied),
                    saved: true,
                    listing: job.listing,
                })
                .collect(),
        };

        BoardSnapshot {
            jobs,
            view: self.view,
            category: self.category,
            russian: self.russian,
            search_term: self.search_term.clone(),
            loading: self.pending.is_some(),
            // Fetch errors belong to the search view; the saved view is
            // fully local and never shows one.
            error: match self.view {
                View::Search => self.error.clone(),
                View::Saved => None,
            },
            saved_count: self.saved.len(),
        }
    }
}
