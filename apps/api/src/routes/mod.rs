pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::flow::handlers as flow;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless analysis
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        // Session flow
        .route("/api/v1/sessions", post(flow::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(flow::handle_get_session).delete(flow::handle_end_session),
        )
        .route("/api/v1/sessions/:id/start", post(flow::handle_start))
        .route("/api/v1/sessions/:id/input", put(flow::handle_set_text))
        .route(
            "/api/v1/sessions/:id/input/file",
            post(flow::handle_import_file),
        )
        .route("/api/v1/sessions/:id/submit", post(flow::handle_submit))
        .route("/api/v1/sessions/:id/reset", post(flow::handle_reset))
        .route(
            "/api/v1/sessions/:id/notice/dismiss",
            post(flow::handle_dismiss_notice),
        )
        // Result presentation
        .route("/api/v1/sessions/:id/view", put(flow::handle_set_view))
        .route(
            "/api/v1/sessions/:id/paywall/open",
            post(flow::handle_open_paywall),
        )
        .route(
            "/api/v1/sessions/:id/paywall/close",
            post(flow::handle_close_paywall),
        )
        .route(
            "/api/v1/sessions/:id/paywall/purchase",
            post(flow::handle_purchase),
        )
        .with_state(state)
}
