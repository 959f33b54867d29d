use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery, PandalId};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::pandals::dtos::{
    CreatePandalDto, DistrictSummaryDto, DistrictsQuery, PandalResponseDto, PendingPandalsQuery,
    SearchPandalsQuery,
};
use crate::features::pandals::services::{ApprovalService, DistrictService, PandalService};
use crate::shared::types::ApiResponse;

/// Shared state for pandal routes
#[derive(Clone)]
pub struct PandalState {
    pub pandal_service: Arc<PandalService>,
    pub approval_service: Arc<ApprovalService>,
    pub district_service: Arc<DistrictService>,
}

/// Submit a new pandal for moderation
#[utoipa::path(
    post,
    path = "/api/pandals",
    request_body = CreatePandalDto,
    responses(
        (status = 201, description = "Pandal submitted and pending approval", body = ApiResponse<PandalResponseDto>),
        (status = 400, description = "Validation error or unsupported location"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "pandals"
)]
pub async fn create_pandal(
    user: AuthenticatedUser,
    State(state): State<PandalState>,
    AppJson(dto): AppJson<CreatePandalDto>,
) -> Result<(StatusCode, Json<ApiResponse<PandalResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let pandal = state.pandal_service.create(dto, &user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(pandal),
            Some("Pandal submitted for approval".to_string()),
            None,
        )),
    ))
}

/// Search approved pandals
///
/// With `lng` and `lat`, results are limited to `radius` meters and sorted nearest first.
#[utoipa::path(
    get,
    path = "/api/pandals",
    params(SearchPandalsQuery),
    responses(
        (status = 200, description = "Matching pandals", body = ApiResponse<Vec<PandalResponseDto>>),
        (status = 400, description = "Invalid search parameters")
    ),
    security(("bearer_auth" = [])),
    tag = "pandals"
)]
pub async fn search_pandals(
    State(state): State<PandalState>,
    AppQuery(query): AppQuery<SearchPandalsQuery>,
) -> Result<Json<ApiResponse<Vec<PandalResponseDto>>>> {
    let pandals = state.pandal_service.search_published(&query).await?;
    let total = pandals.len();
    Ok(Json(ApiResponse::list(pandals, total)))
}

/// Moderation queue: pending pandals the caller did not submit and has not voted on
#[utoipa::path(
    get,
    path = "/api/pandals/pending",
    params(PendingPandalsQuery),
    responses(
        (status = 200, description = "Pending pandals", body = ApiResponse<Vec<PandalResponseDto>>),
        (status = 400, description = "Invalid search parameters")
    ),
    security(("bearer_auth" = [])),
    tag = "pandals"
)]
pub async fn list_pending_pandals(
    user: AuthenticatedUser,
    State(state): State<PandalState>,
    AppQuery(query): AppQuery<PendingPandalsQuery>,
) -> Result<Json<ApiResponse<Vec<PandalResponseDto>>>> {
    let pandals = state
        .pandal_service
        .search_pending(&query, &user.user_id)
        .await?;
    let total = pandals.len();
    Ok(Json(ApiResponse::list(pandals, total)))
}

/// Get pandal by ID
#[utoipa::path(
    get,
    path = "/api/pandals/{id}",
    params(
        ("id" = Uuid, Path, description = "Pandal ID")
    ),
    responses(
        (status = 200, description = "Pandal found", body = ApiResponse<PandalResponseDto>),
        (status = 400, description = "Invalid pandal ID format"),
        (status = 404, description = "Pandal not found")
    ),
    security(("bearer_auth" = [])),
    tag = "pandals"
)]
pub async fn get_pandal(
    State(state): State<PandalState>,
    PandalId(id): PandalId,
) -> Result<Json<ApiResponse<PandalResponseDto>>> {
    let pandal = state.pandal_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(pandal), None, None)))
}

/// Vote to approve a pending pandal
///
/// Voting on an already approved pandal returns it unchanged.
#[utoipa::path(
    post,
    path = "/api/pandals/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Pandal ID")
    ),
    responses(
        (status = 200, description = "Vote registered", body = ApiResponse<PandalResponseDto>),
        (status = 400, description = "Invalid pandal ID format"),
        (status = 404, description = "Pandal not found"),
        (status = 409, description = "Already voted, or pandal not open for approval")
    ),
    security(("bearer_auth" = [])),
    tag = "pandals"
)]
pub async fn approve_pandal(
    user: AuthenticatedUser,
    State(state): State<PandalState>,
    PandalId(id): PandalId,
) -> Result<Json<ApiResponse<PandalResponseDto>>> {
    let pandal = state.approval_service.approve(id, &user.user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(pandal),
        Some("Pandal approval registered".to_string()),
        None,
    )))
}

/// Approved pandal counts per district, highest first
#[utoipa::path(
    get,
    path = "/api/pandals/districts",
    params(DistrictsQuery),
    responses(
        (status = 200, description = "District rollup", body = ApiResponse<Vec<DistrictSummaryDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "pandals"
)]
pub async fn list_districts(
    State(state): State<PandalState>,
    AppQuery(query): AppQuery<DistrictsQuery>,
) -> Result<Json<ApiResponse<Vec<DistrictSummaryDto>>>> {
    let districts = state
        .district_service
        .districts_summary(query.country.as_deref(), query.state.as_deref())
        .await?;
    let total = districts.len();
    Ok(Json(ApiResponse::list(districts, total)))
}
