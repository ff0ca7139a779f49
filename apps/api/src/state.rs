use std::sync::Arc;

use tokio::sync::Mutex;

use crate::board::JobBoard;
use crate::listings::JobSource;
use crate::store::SavedJobsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one board instance. The mutex serializes every intent, so each
    /// mutation runs to completion before the next one observes state.
    pub board: Arc<Mutex<JobBoard>>,
    /// Pluggable listing source. Tests substitute a stub.
    pub source: Arc<dyn JobSource>,
    pub store: SavedJobsStore,
}
