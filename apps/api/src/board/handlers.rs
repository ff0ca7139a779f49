use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::board::{BoardSnapshot, FetchTag, JobBoard, View};
use crate::errors::AppError;
use crate::listings::JobSource;
use crate::models::job::{JobCategory, JobListing};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SetCategoryRequest {
    pub category: JobCategory,
}

#[derive(Deserialize)]
pub struct SetLanguageRequest {
    pub russian: bool,
}

#[derive(Deserialize)]
pub struct SetViewRequest {
    pub view: View,
}

#[derive(Deserialize)]
pub struct SetSearchRequest {
    pub term: String,
}

#[derive(Serialize)]
pub struct EncouragementResponse {
    pub text: String,
}

/// GET /api/v1/board
///
/// Current snapshot. The first snapshot request in the search view for a
/// given filter combination also kicks off the fetch, mirroring a client
/// that loads listings on startup.
pub async fn handle_get_board(State(state): State<AppState>) -> Json<BoardSnapshot> {
    let mut board = state.board.lock().await;
    if let Some(tag) = board.ensure_fresh() {
        spawn_fetch(&state, tag);
    }
    Json(board.snapshot())
}

/// POST /api/v1/board/category
pub async fn handle_set_category(
    State(state): State<AppState>,
    Json(req): Json<SetCategoryRequest>,
) -> Json<BoardSnapshot> {
    let mut board = state.board.lock().await;
    if let Some(tag) = board.set_category(req.category) {
        spawn_fetch(&state, tag);
    }
    Json(board.snapshot())
}

/// POST /api/v1/board/language
pub async fn handle_set_language(
    State(state): State<AppState>,
    Json(req): Json<SetLanguageRequest>,
) -> Json<BoardSnapshot> {
    let mut board = state.board.lock().await;
    if let Some(tag) = board.set_language(req.russian) {
        spawn_fetch(&state, tag);
    }
    Json(board.snapshot())
}

/// POST /api/v1/board/view
pub async fn handle_set_view(
    State(state): State<AppState>,
    Json(req): Json<SetViewRequest>,
) -> Json<BoardSnapshot> {
    let mut board = state.board.lock().await;
    if let Some(tag) = board.set_view(req.view) {
        spawn_fetch(&state, tag);
    }
    Json(board.snapshot())
}

/// POST /api/v1/board/search
pub async fn handle_set_search(
    State(state): State<AppState>,
    Json(req): Json<SetSearchRequest>,
) -> Json<BoardSnapshot> {
    let mut board = state.board.lock().await;
    board.set_search_term(req.term);
    Json(board.snapshot())
}

/// POST /api/v1/board/refresh
pub async fn handle_refresh(State(state): State<AppState>) -> Json<BoardSnapshot> {
    let mut board = state.board.lock().await;
    if let Some(tag) = board.refresh() {
        spawn_fetch(&state, tag);
    }
    Json(board.snapshot())
}

/// POST /api/v1/saved
///
/// Saves a listing. Records carry their own identity, so a record whose id
/// is already saved leaves the collection untouched and still returns the
/// refreshed snapshot.
pub async fn handle_save_job(
    State(state): State<AppState>,
    Json(listing): Json<JobListing>,
) -> Result<Json<BoardSnapshot>, AppError> {
    if listing.id.trim().is_empty() {
        return Err(AppError::Validation("job id must not be empty".to_string()));
    }

    let mut board = state.board.lock().await;
    if board.save_job(listing) {
        state.store.save(board.saved());
    }
    Ok(Json(board.snapshot()))
}

/// DELETE /api/v1/saved/:id
pub async fn handle_remove_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<BoardSnapshot> {
    let mut board = state.board.lock().await;
    if board.remove_job(&id) {
        state.store.save(board.saved());
    }
    Json(board.snapshot())
}

/// PATCH /api/v1/saved/:id/applied
pub async fn handle_toggle_applied(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<BoardSnapshot> {
    let mut board = state.board.lock().await;
    if board.toggle_applied(&id) {
        state.store.save(board.saved());
    }
    Json(board.snapshot())
}

/// POST /api/v1/encouragement
///
/// Always 200 with a non-empty line; failures degrade inside the source.
pub async fn handle_encouragement(State(state): State<AppState>) -> Json<EncouragementResponse> {
    let text = state.source.fetch_encouragement().await;
    Json(EncouragementResponse { text })
}

/// Spawns the network round trip for `tag`. The handler keeps holding the
/// board lock, so the spawned task cannot apply its result before the
/// snapshot that reported `loading` goes out.
fn spawn_fetch(state: &AppState, tag: FetchTag) {
    let board = Arc::clone(&state.board);
    let source = Arc::clone(&state.source);
    tokio::spawn(run_fetch(board, source, tag));
}

/// One fetch round trip: call the source, then apply the result under the
/// board lock. Failures land in the snapshot, never in an HTTP status.
pub(crate) async fn run_fetch(
    board: Arc<Mutex<JobBoard>>,
    source: Arc<dyn JobSource>,
    tag: FetchTag,
) {
    let result = source.fetch_jobs(tag.category, tag.language).await;
    if let Err(e) = &result {
        warn!(
            "listing fetch failed for {}/{}: {e}",
            tag.category.as_str(),
            tag.language.as_str()
        );
    }
    board.lock().await.complete_fetch(tag, result);
}
