use sqlx::FromRow;

use crate::features::pandals::models::PandalStatus;

/// One row of the store's grouping aggregation
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DistrictCount {
    pub district: String,
    pub pandal_count: i64,
}

/// Narrowing applied before grouping by district
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictFilter {
    pub status: PandalStatus,
    pub country: Option<String>,
    pub state: Option<String>,
}

/// Derived rollup row: never persisted, recomputed on every request
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictSummary {
    /// District code as stored on pandals
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub pandal_count: i64,
}
