use crate::core::config::SearchConfig;
use crate::core::error::{AppError, Result};
use crate::features::pandals::dtos::{PendingPandalsQuery, SearchPandalsQuery};
use crate::features::pandals::models::{PandalFilter, PandalStatus, Proximity};
use crate::shared::constants::MAX_FILTER_LENGTH;

/// Composes search predicates from request criteria. Performs no I/O.
#[derive(Debug, Clone, Copy)]
pub struct PandalQueryBuilder {
    default_radius_meters: f64,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl PandalQueryBuilder {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            default_radius_meters: config.default_radius_meters,
        }
    }

    /// Public discovery: approved entries, optional proximity, tag and text
    pub fn published(&self, query: &SearchPandalsQuery) -> Result<PandalFilter> {
        let mut filter = PandalFilter::with_status(PandalStatus::Approved);
        filter.proximity = self.proximity(
            query.lng.as_deref(),
            query.lat.as_deref(),
            query.radius.as_deref(),
        )?;
        filter.tag = Self::bounded("tag", query.tag.as_deref())?;
        filter.text = Self::bounded("q", query.q.as_deref())?;
        Ok(filter)
    }

    /// Moderation queue: pending entries the requester can still act on
    pub fn moderation_queue(
        &self,
        query: &PendingPandalsQuery,
        requester: &str,
    ) -> Result<PandalFilter> {
        let mut filter = PandalFilter::with_status(PandalStatus::Pending);
        filter.proximity = self.proximity(
            query.lng.as_deref(),
            query.lat.as_deref(),
            query.radius.as_deref(),
        )?;
        filter.exclude_user = present(Some(requester)).map(str::to_string);
        Ok(filter)
    }

    /// Both coordinates or neither. An unusable radius falls back to the default.
    pub fn proximity(
        &self,
        lng: Option<&str>,
        lat: Option<&str>,
        radius: Option<&str>,
    ) -> Result<Option<Proximity>> {
        let (lng, lat) = match (present(lng), present(lat)) {
            (None, None) => return Ok(None),
            (Some(lng), Some(lat)) => (lng, lat),
            _ => {
                return Err(AppError::Validation(
                    "Both lng and lat query parameters are required for a geospatial search"
                        .to_string(),
                ))
            }
        };

        let invalid = || AppError::Validation("Invalid lng or lat coordinates".to_string());
        let lng = lng.parse::<f64>().map_err(|_| invalid())?;
        let lat = lat.parse::<f64>().map_err(|_| invalid())?;
        if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
            return Err(invalid());
        }

        let radius_meters = present(radius)
            .and_then(|r| r.parse::<f64>().ok())
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(self.default_radius_meters);

        Ok(Some(Proximity {
            lng,
            lat,
            radius_meters,
        }))
    }

    fn bounded(name: &str, value: Option<&str>) -> Result<Option<String>> {
        match present(value) {
            Some(v) if v.chars().count() > MAX_FILTER_LENGTH => Err(AppError::Validation(
                format!("{} must not exceed {} characters", name, MAX_FILTER_LENGTH),
            )),
            other => Ok(other.map(str::to_string)),
        }
    }
}
