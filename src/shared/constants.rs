/// Mean Earth radius in meters, used for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Maximum length of a pandal name
pub const MAX_NAME_LENGTH: u64 = 200;

/// Maximum length of free-text search and tag filters
pub const MAX_FILTER_LENGTH: usize = 100;

/// GeoJSON discriminator for point geometries
pub const GEOMETRY_POINT: &str = "Point";
