use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::locations::dtos::AdministrativeQuery;
use crate::features::locations::models::AdministrativeData;
use crate::features::locations::services::LocationValidator;
use crate::shared::types::ApiResponse;

/// Get the administrative geography hierarchy
///
/// Public endpoint used by entry forms to populate country/state/district pickers.
#[utoipa::path(
    get,
    path = "/api/locations/administrative",
    params(AdministrativeQuery),
    responses(
        (status = 200, description = "Filtered administrative hierarchy", body = ApiResponse<AdministrativeData>),
    ),
    tag = "locations"
)]
pub async fn get_administrative_data(
    State(validator): State<LocationValidator>,
    AppQuery(query): AppQuery<AdministrativeQuery>,
) -> Result<Json<ApiResponse<AdministrativeData>>> {
    let data = validator.administrative_data(query.country.as_deref(), query.state.as_deref());
    Ok(Json(ApiResponse::success(Some(data), None, None)))
}
