use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::locations::{handlers as locations_handlers, models as locations_models};
use crate::features::pandals::{
    dtos as pandals_dtos, handlers as pandals_handlers, models as pandals_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Pandals (protected)
        pandals_handlers::create_pandal,
        pandals_handlers::search_pandals,
        pandals_handlers::list_pending_pandals,
        pandals_handlers::get_pandal,
        pandals_handlers::approve_pandal,
        pandals_handlers::list_districts,
        // Locations (public)
        locations_handlers::get_administrative_data,
    ),
    components(
        schemas(
            // Shared
            Meta,
            auth::model::AuthenticatedUser,
            // Pandals
            pandals_models::PandalStatus,
            pandals_dtos::GeoPointDto,
            pandals_dtos::CreatePandalDto,
            pandals_dtos::PandalResponseDto,
            pandals_dtos::DistrictSummaryDto,
            ApiResponse<pandals_dtos::PandalResponseDto>,
            ApiResponse<Vec<pandals_dtos::PandalResponseDto>>,
            ApiResponse<Vec<pandals_dtos::DistrictSummaryDto>>,
            // Locations
            locations_models::AdminDistrict,
            locations_models::AdminState,
            locations_models::AdminCountry,
            locations_models::AdministrativeData,
            ApiResponse<locations_models::AdministrativeData>,
        )
    ),
    tags(
        (name = "pandals", description = "Crowd-moderated pandal directory"),
        (name = "locations", description = "Administrative geography (public)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Pandal Directory API",
        version = "0.1.0",
        description = "API documentation for the pandal directory",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Overrides the document info with configured values
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
