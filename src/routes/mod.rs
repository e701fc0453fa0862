mod activity;
mod admin;
mod analytics;
mod attention;
mod auth_routes;
mod health;
mod progress;
mod rephrase;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/activity/next", get(activity::next))
        .route("/api/activity/recommended", get(activity::recommended))
        .route("/api/activity/submit", post(activity::submit))
        .route("/api/progress", get(progress::overall))
        .route("/api/progress/modules", get(progress::modules))
        .route("/api/rephrase", post(rephrase::rephrase))
        .route("/api/attention", post(attention::score))
        .route("/api/auth/register", post(auth_routes::register))
        .route("/api/auth/login", post(auth_routes::login))
        .route("/api/analytics/models", get(analytics::models))
        .route("/api/admin/ml-logs", get(admin::ml_logs))
        .route("/api/admin/nlp-logs", get(admin::nlp_logs))
        .route("/api/admin/accuracy-trends", get(admin::accuracy_trends))
        .with_state(state)
}
