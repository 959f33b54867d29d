use axum::{routing::get, Router};

use crate::features::locations::handlers;
use crate::features::locations::services::LocationValidator;

/// Create routes for the locations feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(validator: LocationValidator) -> Router {
    Router::new()
        .route(
            "/api/locations/administrative",
            get(handlers::get_administrative_data),
        )
        .with_state(validator)
}
