use crate::features::pandals::models::{Pandal, PandalStatus};
use crate::shared::geo::haversine_distance;

/// "Within distance" predicate around a point; radius in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub lng: f64,
    pub lat: f64,
    pub radius_meters: f64,
}

impl Proximity {
    pub fn distance_to(&self, pandal: &Pandal) -> f64 {
        haversine_distance(self.lat, self.lng, pandal.lat, pandal.lng)
    }
}

/// Search predicate consumed by `PandalStore::find_all`.
///
/// All present criteria must hold. `text` is itself a disjunction over
/// name, area and district.
#[derive(Debug, Clone, PartialEq)]
pub struct PandalFilter {
    pub status: PandalStatus,
    pub proximity: Option<Proximity>,
    /// Entry tags must contain this value
    pub tag: Option<String>,
    /// Case-insensitive substring, matched literally
    pub text: Option<String>,
    /// Hide entries created by, or already voted on by, this user
    pub exclude_user: Option<String>,
}

impl PandalFilter {
    pub fn with_status(status: PandalStatus) -> Self {
        Self {
            status,
            proximity: None,
            tag: None,
            text: None,
            exclude_user: None,
        }
    }
}
