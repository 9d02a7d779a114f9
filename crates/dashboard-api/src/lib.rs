//! Virantis dashboard API
//!
//! Serves the portfolio dashboard, assessment comparison, threat model views,
//! printable reports and the clarification conversation over the fixture data.

pub mod config;
pub mod handlers;
pub mod models;
pub mod session;
pub mod store;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use handlers::{ApiError, AppState};
pub use session::Session;
pub use store::{FixtureStore, Workspace};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/api/session",
            post(handlers::login_handler).delete(handlers::logout_handler),
        )
        .route("/api/portfolio", get(handlers::portfolio_handler))
        .route("/api/applications", get(handlers::list_applications_handler))
        .route(
            "/api/applications/{app_id}",
            get(handlers::get_application_handler),
        )
        .route(
            "/api/applications/{app_id}/assessments/{assessment_id}",
            get(handlers::get_assessment_handler),
        )
        .route(
            "/api/applications/{app_id}/compare",
            get(handlers::compare_handler),
        )
        .route(
            "/api/applications/{app_id}/selection",
            get(handlers::get_selection_handler).post(handlers::toggle_selection_handler),
        )
        .route(
            "/api/assessments/recent",
            get(handlers::recent_assessments_handler),
        )
        .route("/api/threat-model/threats", get(handlers::threats_handler))
        .route(
            "/api/threat-model/attack-path",
            get(handlers::attack_path_handler),
        )
        .route(
            "/api/reports/threat-model",
            get(handlers::threat_report_handler),
        )
        .route(
            "/api/reports/executive-summary",
            get(handlers::executive_summary_handler),
        )
        .route("/api/notifications", get(handlers::notifications_handler))
        .route(
            "/api/notifications/read-all",
            post(handlers::mark_all_notifications_read_handler),
        )
        .route(
            "/api/notifications/{id}/read",
            post(handlers::mark_notification_read_handler),
        )
        .route("/api/approvals", get(handlers::approvals_handler))
        .route(
            "/api/approvals/{id}",
            delete(handlers::dismiss_approval_handler),
        )
        .route("/api/remediations", get(handlers::remediations_handler))
        .route(
            "/api/clarifications",
            post(handlers::start_clarification_handler),
        )
        .route(
            "/api/clarifications/{id}",
            get(handlers::get_clarification_handler),
        )
        .route(
            "/api/clarifications/{id}/answers",
            post(handlers::answer_clarification_handler),
        )
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
