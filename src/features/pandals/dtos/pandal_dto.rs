use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::pandals::models::{DistrictSummary, Pandal, PandalStatus};
use crate::shared::constants::{GEOMETRY_POINT, MAX_NAME_LENGTH};
use crate::shared::validation::GEO_CODE_REGEX;

/// GeoJSON-style point: `coordinates` is `[longitude, latitude]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPointDto {
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub geometry_type: String,
    #[schema(example = json!([88.3639, 22.5726]))]
    pub coordinates: Vec<f64>,
}

impl GeoPointDto {
    pub fn point(lng: f64, lat: f64) -> Self {
        Self {
            geometry_type: GEOMETRY_POINT.to_string(),
            coordinates: vec![lng, lat],
        }
    }

    /// `(lng, lat)` when the point is well formed
    pub fn lng_lat(&self) -> Option<(f64, f64)> {
        match self.coordinates.as_slice() {
            [lng, lat] => Some((*lng, *lat)),
            _ => None,
        }
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_geo_point(point: &GeoPointDto) -> Result<(), ValidationError> {
    if point.geometry_type != GEOMETRY_POINT {
        return Err(validation_error(
            "geometry_type",
            "Location type must be 'Point'",
        ));
    }

    let (lng, lat) = point.lng_lat().ok_or_else(|| {
        validation_error(
            "coordinates",
            "Location coordinates must be [longitude, latitude]",
        )
    })?;

    if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
        return Err(validation_error(
            "coordinates",
            "Longitude must be within [-180, 180] and latitude within [-90, 90]",
        ));
    }

    Ok(())
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "Must not be blank"));
    }
    Ok(())
}

/// Request DTO for submitting a new pandal.
///
/// Any `status`, `approvalCount` or `approvedBy` in the body is ignored; new
/// entries always start pending with no votes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePandalDto {
    #[validate(
        length(min = 1, max = MAX_NAME_LENGTH, message = "Name must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Bagbazar Sarbojanin")]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Bagbazar")]
    pub area: String,

    pub theme: Option<String>,

    #[validate(regex(path = *GEO_CODE_REGEX, message = "Invalid country code"))]
    #[schema(example = "IN")]
    pub country: String,

    #[validate(regex(path = *GEO_CODE_REGEX, message = "Invalid state code"))]
    #[schema(example = "WB")]
    pub state: String,

    #[validate(regex(path = *GEO_CODE_REGEX, message = "Invalid district code"))]
    #[schema(example = "KOL")]
    pub district: String,

    #[validate(custom(function = "validate_geo_point"))]
    pub location: GeoPointDto,

    pub images: Option<Vec<String>>,

    pub tags: Option<Vec<String>>,

    /// Submission time is used when absent
    pub created_at: Option<DateTime<Utc>>,
}

/// Response DTO for pandal
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PandalResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub area: String,
    pub theme: String,
    pub country: String,
    pub state: String,
    pub district: String,
    pub location: GeoPointDto,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub status: PandalStatus,
    pub approval_count: i32,
    pub approved_by: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Great-circle distance from the search point, present on proximity searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}

impl PandalResponseDto {
    pub fn with_distance(mut self, distance_meters: Option<f64>) -> Self {
        self.distance_meters = distance_meters;
        self
    }
}

impl From<Pandal> for PandalResponseDto {
    fn from(p: Pandal) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            area: p.area,
            theme: p.theme,
            country: p.country,
            state: p.state,
            district: p.district,
            location: GeoPointDto::point(p.lng, p.lat),
            images: p.images,
            tags: p.tags,
            rating_avg: p.rating_avg,
            rating_count: p.rating_count,
            status: p.status,
            approval_count: p.approval_count,
            approved_by: p.approved_by,
            created_by: p.created_by,
            created_at: p.created_at,
            updated_at: p.updated_at,
            distance_meters: None,
        }
    }
}

/// Query parameters for searching published pandals.
///
/// Values arrive as raw strings so that coordinate errors can be reported precisely.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SearchPandalsQuery {
    /// Longitude; requires `lat`
    #[param(example = "88.3639")]
    pub lng: Option<String>,
    /// Latitude; requires `lng`
    #[param(example = "22.5726")]
    pub lat: Option<String>,
    /// Search radius in meters (defaults to 5000 when missing or not positive)
    #[param(example = "2000")]
    pub radius: Option<String>,
    /// Only pandals carrying this tag
    #[param(example = "heritage")]
    pub tag: Option<String>,
    /// Case-insensitive match on name, area or district
    #[param(example = "bagbazar")]
    pub q: Option<String>,
}

/// Query parameters for the moderation queue
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PendingPandalsQuery {
    pub lng: Option<String>,
    pub lat: Option<String>,
    pub radius: Option<String>,
}

/// Optional narrowing for the district rollup
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DistrictsQuery {
    #[param(example = "IN")]
    pub country: Option<String>,
    #[param(example = "WB")]
    pub state: Option<String>,
}

/// District rollup row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistrictSummaryDto {
    /// District code
    pub id: String,
    /// Resolved district name (falls back to the code)
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub pandal_count: i64,
}

impl From<DistrictSummary> for DistrictSummaryDto {
    fn from(s: DistrictSummary) -> Self {
        Self {
            id: s.id,
            name: s.name,
            image: s.image,
            pandal_count: s.pandal_count,
        }
    }
}
