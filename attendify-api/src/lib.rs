//! attendify-api library - attendance service HTTP API
//!
//! Owns the application state and router. Handlers live in `api`, all
//! invariants live in `store`.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod auth;
pub mod store;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Externally reachable base URL, used to build attendance links
    pub public_url: String,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, public_url: String) -> Self {
        Self { db, public_url }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    let api = Router::new()
        .route("/api/sessions", post(api::create_session))
        .route("/api/sessions/:session_id", get(api::get_session))
        .route("/api/sessions/:session_id/close", post(api::close_session))
        .route("/api/students", post(api::add_student).get(api::list_students))
        .route("/api/students/count", get(api::count_students))
        .route("/api/students/:student_id", delete(api::remove_student))
        .route(
            "/api/teachers",
            post(api::add_teacher).get(api::list_teachers).delete(api::remove_teacher),
        )
        .route("/api/teachers/count", get(api::count_teachers))
        .route("/api/teachers/login", post(api::teacher_login))
        .route("/api/attendance", post(api::submit_attendance))
        .route("/api/attendance/live", get(api::live_attendance))
        .route("/api/attendance/records", get(api::list_class_attendance))
        .route("/api/attendance/bulk-delete", post(api::bulk_delete_attendance))
        .route("/api/attendance/:id", delete(api::remove_attendance_record));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        // The browser clients are served from a separate origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
