use std::sync::Arc;

use axum::{Extension, Router};
use fake::faker::lorem::en::Word;
use fake::Fake;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::locations::models::AdministrativeData;
use crate::features::locations::LocationValidator;
use crate::features::pandals::dtos::{CreatePandalDto, GeoPointDto};

/// Small hierarchy covering active, inactive and cross-state cases:
/// - WB (active): KOL, HWH active; NDG inactive
/// - OD (active): KHD, PUR active
/// - AS (inactive): KAM active
pub const SAMPLE_ADMIN_JSON: &str = r#"{
    "version": "test",
    "last_updated": "2024-09-01",
    "country": {"code": "IN", "name": "India"},
    "states": [
        {
            "code": "WB", "name": "West Bengal", "type": "state", "iso_code": "IN-WB", "is_active": true,
            "districts": [
                {"code": "KOL", "name": "Kolkata", "is_active": true, "image": "https://images.example.org/districts/kolkata.jpg"},
                {"code": "HWH", "name": "Howrah", "is_active": true},
                {"code": "NDG", "name": "Nadia", "is_active": false, "image": "https://images.example.org/districts/nadia.jpg"}
            ]
        },
        {
            "code": "OD", "name": "Odisha", "type": "state", "iso_code": "IN-OD", "is_active": true,
            "districts": [
                {"code": "KHD", "name": "Khordha", "is_active": true},
                {"code": "PUR", "name": "Puri", "is_active": true}
            ]
        },
        {
            "code": "AS", "name": "Assam", "type": "state", "iso_code": "IN-AS", "is_active": false,
            "districts": [
                {"code": "KAM", "name": "Kamrup", "is_active": true}
            ]
        }
    ]
}"#;

pub fn sample_hierarchy() -> Arc<AdministrativeData> {
    Arc::new(AdministrativeData::from_json(SAMPLE_ADMIN_JSON.as_bytes()).unwrap())
}

pub fn sample_location_validator() -> LocationValidator {
    LocationValidator::new(sample_hierarchy())
}

/// Valid creation payload for a Kolkata pandal near the given point
pub fn create_dto_at(lng: f64, lat: f64) -> CreatePandalDto {
    let word: String = Word().fake();
    CreatePandalDto {
        name: format!("{} Sarbojanin", word),
        description: Some("Community puja".to_string()),
        area: "Bagbazar".to_string(),
        theme: Some("Heritage".to_string()),
        country: "IN".to_string(),
        state: "WB".to_string(),
        district: "KOL".to_string(),
        location: GeoPointDto::point(lng, lat),
        images: None,
        tags: Some(vec!["heritage".to_string()]),
        created_at: None,
    }
}

pub fn create_dto() -> CreatePandalDto {
    create_dto_at(88.3639, 22.5726)
}

pub fn test_user(user_id: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: user_id.to_string(),
    }
}

/// Wrap a router so every request carries the given user, standing in for `auth_middleware`
pub fn with_user(router: Router, user_id: &str) -> Router {
    router.layer(Extension(test_user(user_id)))
}
