use axum::{
    routing::{get, post},
    Router,
};

use crate::features::pandals::handlers::{self, PandalState};

/// Create routes for the pandals feature
///
/// Note: This feature requires authentication
pub fn routes(state: PandalState) -> Router {
    Router::new()
        .route(
            "/api/pandals",
            post(handlers::create_pandal).get(handlers::search_pandals),
        )
        .route("/api/pandals/pending", get(handlers::list_pending_pandals))
        .route("/api/pandals/districts", get(handlers::list_districts))
        .route("/api/pandals/{id}", get(handlers::get_pandal))
        .route(
            "/api/pandals/{id}/approve",
            post(handlers::approve_pandal)
                .patch(handlers::approve_pandal)
                .put(handlers::approve_pandal),
        )
        .with_state(state)
}
