//! Pure view derivation: filter by search term, then order by view. Both
//! functions borrow the source collections and return fresh vectors; the
//! board's state is never touched.

use std::cmp::Ordering;

use crate::models::job::{JobListing, SavedJob};

/// Case-insensitive substring match over title, company, and description.
/// An empty term matches everything.
fn matches_term(listing: &JobListing, lowered: &str) -> bool {
    if lowered.is_empty() {
        return true;
    }
    listing.title.to_lowercase().contains(lowered)
        || listing.company.to_lowercase().contains(lowered)
        || listing.description.to_lowercase().contains(lowered)
}

/// Search view: filtered, newest first. `sort_by` is stable, so equal dates
/// keep their fetched order.
pub fn derive_search_view(fetched: &[JobListing], term: &str) -> Vec<JobListing> {
    let lowered = term.to_lowercase();
    let mut rows: Vec<JobListing> = fetched
        .iter()
        .filter(|l| matches_term(l, &lowered))
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.date_posted.cmp(&a.date_posted));
    rows
}

/// Saved view: filtered, not-yet-applied before applied, newest first
/// within each partition.
pub fn derive_saved_view(saved: &[SavedJob], term: &str) -> Vec<SavedJob> {
    let lowered = term.to_lowercase();
    let mut rows: Vec<SavedJob> = saved
        .iter()
        .filter(|j| matches_term(&j.listing, &lowered))
        .cloned()
        .collect();
    rows.sort_by(|a, b| match (a.applied, b.applied) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => b.listing.date_posted.cmp(&a.listing.date_posted),
    });
    rows
}
