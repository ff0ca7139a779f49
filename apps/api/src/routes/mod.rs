pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::board::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Board state and intents
        .route("/api/v1/board", get(handlers::handle_get_board))
        .route(
            "/api/v1/board/category",
            post(handlers::handle_set_category),
        )
        .route(
            "/api/v1/board/language",
            post(handlers::handle_set_language),
        )
        .route("/api/v1/board/view", post(handlers::handle_set_view))
        .route("/api/v1/board/search", post(handlers::handle_set_search))
        .route("/api/v1/board/refresh", post(handlers::handle_refresh))
        // Saved collection
        .route("/api/v1/saved", post(handlers::handle_save_job))
        .route("/api/v1/saved/:id", delete(handlers::handle_remove_job))
        .route(
            "/api/v1/saved/:id/applied",
            patch(handlers::handle_toggle_applied),
        )
        // Secondary generation call
        .route(
            "/api/v1/encouragement",
            post(handlers::handle_encouragement),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use super::*;
    use crate::board::JobBoard;
    use crate::listings::{FetchError, JobSource};
    use crate::models::job::{JobCategory, JobLanguage, JobListing};
    use crate::store::{MemoryStorage, SavedJobsStore};

    struct StubSource {
        jobs: Vec<JobListing>,
    }

    #[async_trait]
    impl JobSource for StubSource {
        async fn fetch_jobs(
            &self,
            _category: JobCategory,
            _language: JobLanguage,
        ) -> Result<Vec<JobListing>, FetchError> {
            Ok(self.jobs.clone())
        }

        async fn fetch_encouragement(&self) -> String {
            "Onward. - Test".to_string()
        }
    }

    struct FailingSource;

    #[async_trait]
    impl JobSource for FailingSource {
        async fn fetch_jobs(
            &self,
            _category: JobCategory,
            _language: JobLanguage,
        ) -> Result<Vec<JobListing>, FetchError> {
            Err(FetchError::NoJson)
        }

        async fn fetch_encouragement(&self) -> String {
            "unused".to_string()
        }
    }

    fn listing(id: &str, title: &str, date: &str) -> JobListing {
        JobListing {
            id: id.to_string(),
            title: title.to_string(),
            company: "TestCo".to_string(),
            description: "Remote work.".to_string(),
            date_posted: date.parse::<NaiveDate>().unwrap(),
            location: "Remote".to_string(),
            language: JobLanguage::English,
            category: JobCategory::AI,
            url: format!("https://example.com/{id}"),
        }
    }

    fn listing_json(id: &str) -> Value {
        json!({
            "id": id,
            "title": format!("Role {id}"),
            "company": "TestCo",
            "description": "Remote work.",
            "datePosted": "2024-05-01",
            "location": "Remote",
            "language": "English",
            "category": "AI",
            "url": format!("https://example.com/{id}")
        })
    }

    fn test_state(source: Arc<dyn JobSource>, store: SavedJobsStore) -> AppState {
        AppState {
            board: Arc::new(Mutex::new(JobBoard::new(store.load()))),
            source,
            store,
        }
    }

    fn test_app(jobs: Vec<JobListing>) -> Router {
        let store = SavedJobsStore::new(Arc::new(MemoryStorage::default()));
        build_router(test_state(Arc::new(StubSource { jobs }), store))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(payload) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Polls the board until the spawned fetch has resolved.
    async fn wait_until_loaded(app: &Router) -> Value {
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let (status, body) = send(app.clone(), "GET", "/api/v1/board", None).await;
            assert_eq!(status, StatusCode::OK);
            if body["loading"] == false {
                return body;
            }
        }
        panic!("board never finished loading");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app(vec![]);
        let (status, body) = send(app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_first_board_request_triggers_fetch() {
        let app = test_app(vec![listing("a", "Engineer", "2024-05-01")]);

        let (status, body) = send(app.clone(), "GET", "/api/v1/board", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loading"], true);
        assert_eq!(body["jobs"].as_array().unwrap().len(), 0);

        let body = wait_until_loaded(&app).await;
        assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
        assert_eq!(body["jobs"][0]["id"], "a");
        assert_eq!(body["jobs"][0]["saved"], false);
    }

    #[tokio::test]
    async fn test_set_category_refetches_and_reports_new_filter() {
        let app = test_app(vec![listing("a", "Engineer", "2024-05-01")]);
        wait_until_loaded(&app).await;

        let (status, body) = send(
            app.clone(),
            "POST",
            "/api/v1/board/category",
            Some(json!({"category": "Web3"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Web3");
        assert_eq!(body["loading"], true);

        wait_until_loaded(&app).await;
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let app = test_app(vec![]);

        let (status, _) = send(
            app,
            "POST",
            "/api/v1/board/category",
            Some(json!({"category": "Gardening"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_save_dedup_and_remove_flow() {
        let app = test_app(vec![]);

        let (status, body) = send(
            app.clone(),
            "POST",
            "/api/v1/saved",
            Some(listing_json("j1")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["savedCount"], 1);

        // Saving the same id again changes nothing
        let (_, body) = send(
            app.clone(),
            "POST",
            "/api/v1/saved",
            Some(listing_json("j1")),
        )
        .await;
        assert_eq!(body["savedCount"], 1);

        let (status, body) = send(app.clone(), "DELETE", "/api/v1/saved/j1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["savedCount"], 0);

        // Removing an absent id is still a 200 no-op
        let (status, body) = send(app, "DELETE", "/api/v1/saved/j1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["savedCount"], 0);
    }

    #[tokio::test]
    async fn test_save_with_blank_id_is_rejected() {
        let app = test_app(vec![]);
        let mut payload = listing_json("ignored");
        payload["id"] = json!("   ");

        let (status, body) = send(app, "POST", "/api/v1/saved", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_toggle_applied_shows_in_saved_view() {
        let app = test_app(vec![]);

        send(
            app.clone(),
            "POST",
            "/api/v1/saved",
            Some(listing_json("j1")),
        )
        .await;
        let (status, _) = send(
            app.clone(),
            "PATCH",
            "/api/v1/saved/j1/applied",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            app,
            "POST",
            "/api/v1/board/view",
            Some(json!({"view": "saved"})),
        )
        .await;

        assert_eq!(body["view"], "saved");
        assert_eq!(body["jobs"][0]["id"], "j1");
        assert_eq!(body["jobs"][0]["applied"], true);
    }

    #[tokio::test]
    async fn test_search_term_filters_without_fetching() {
        let app = test_app(vec![
            listing("a", "Alpha Engineer", "2024-05-01"),
            listing("b", "Beta Analyst", "2024-05-02"),
        ]);
        wait_until_loaded(&app).await;

        let (status, body) = send(
            app,
            "POST",
            "/api/v1/board/search",
            Some(json!({"term": "alpha"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loading"], false);
        assert_eq!(body["searchTerm"], "alpha");
        assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
        assert_eq!(body["jobs"][0]["id"], "a");
    }

    #[tokio::test]
    async fn test_fetch_failure_lands_in_snapshot_not_status() {
        let store = SavedJobsStore::new(Arc::new(MemoryStorage::default()));
        let app = build_router(test_state(Arc::new(FailingSource), store));

        let (status, _) = send(app.clone(), "GET", "/api/v1/board", None).await;
        assert_eq!(status, StatusCode::OK);

        let body = wait_until_loaded(&app).await;
        assert!(body["error"].is_string());
        assert_eq!(body["jobs"].as_array().unwrap().len(), 0);

        // Polling again must not restart the fetch
        let (_, body) = send(app, "GET", "/api/v1/board", None).await;
        assert_eq!(body["loading"], false);
    }

    #[tokio::test]
    async fn test_saved_collection_survives_restart() {
        let store = SavedJobsStore::new(Arc::new(MemoryStorage::default()));
        let app = build_router(test_state(
            Arc::new(StubSource { jobs: vec![] }),
            store.clone(),
        ));

        send(
            app.clone(),
            "POST",
            "/api/v1/saved",
            Some(listing_json("kept")),
        )
        .await;

        // Fresh state over the same storage, as after a process restart
        let restarted = build_router(test_state(
            Arc::new(StubSource { jobs: vec![] }),
            store,
        ));
        let (_, body) = send(
            restarted,
            "POST",
            "/api/v1/board/view",
            Some(json!({"view": "saved"})),
        )
        .await;

        assert_eq!(body["savedCount"], 1);
        assert_eq!(body["jobs"][0]["id"], "kept");
        assert_eq!(body["jobs"][0]["applied"], false);
    }

    #[tokio::test]
    async fn test_encouragement_endpoint_returns_text() {
        let app = test_app(vec![]);

        let (status, body) = send(app, "POST", "/api/v1/encouragement", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Onward. - Test");
    }
}
