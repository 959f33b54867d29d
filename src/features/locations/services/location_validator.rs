use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::locations::models::{AdminDistrict, AdministrativeData};

/// Read-only checks and lookups over the administrative hierarchy.
///
/// The hierarchy is loaded once at startup and shared by every request;
/// nothing here mutates it.
#[derive(Clone)]
pub struct LocationValidator {
    data: Arc<AdministrativeData>,
}

/// Treat empty filter values as "no filter"
fn filter_value(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl LocationValidator {
    pub fn new(data: Arc<AdministrativeData>) -> Self {
        Self { data }
    }

    /// Check that the codes name an active district in an active state of the loaded country.
    ///
    /// Inactive states and districts are treated as absent.
    pub fn validate(&self, country_code: &str, state_code: &str, district_code: &str) -> Result<()> {
        if self.data.country.code != country_code {
            return Err(AppError::Validation(format!(
                "unsupported country: {}",
                country_code
            )));
        }

        let state = self
            .data
            .states
            .iter()
            .filter(|s| s.is_active)
            .find(|s| s.code == state_code)
            .ok_or_else(|| {
                AppError::Validation(format!("unsupported or inactive state: {}", state_code))
            })?;

        let district_found = state
            .districts
            .iter()
            .filter(|d| d.is_active)
            .any(|d| d.code == district_code);

        if !district_found {
            return Err(AppError::Validation(format!(
                "unsupported or inactive district: {} in state: {}",
                district_code, state_code
            )));
        }

        Ok(())
    }

    // Lookups deliberately ignore `is_active`: an inactive district can still be
    // displayed even though new entries may not use it.
    fn find_district(
        &self,
        country_code: Option<&str>,
        state_code: Option<&str>,
        district_code: &str,
    ) -> Option<&AdminDistrict> {
        if let Some(country) = filter_value(country_code) {
            if self.data.country.code != country {
                return None;
            }
        }

        let state_code = filter_value(state_code);
        self.data
            .states
            .iter()
            .filter(|s| state_code.is_none_or(|code| s.code == code))
            .flat_map(|s| s.districts.iter())
            .find(|d| d.code == district_code)
    }

    /// Human-readable district name, or the code itself when it cannot be resolved
    pub fn lookup_name(
        &self,
        country_code: Option<&str>,
        state_code: Option<&str>,
        district_code: &str,
    ) -> String {
        self.find_district(country_code, state_code, district_code)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| district_code.to_string())
    }

    pub fn lookup_image(
        &self,
        country_code: Option<&str>,
        state_code: Option<&str>,
        district_code: &str,
    ) -> Option<String> {
        self.find_district(country_code, state_code, district_code)
            .and_then(|d| d.image.clone())
    }

    /// Copy of the hierarchy narrowed by the optional country and state filters.
    ///
    /// A country filter that does not match leaves the country with no states;
    /// a state filter keeps only that state, active or not.
    pub fn administrative_data(
        &self,
        country_code: Option<&str>,
        state_code: Option<&str>,
    ) -> AdministrativeData {
        let mut result = (*self.data).clone();

        if let Some(country) = filter_value(country_code) {
            if result.country.code != country {
                result.states.clear();
                return result;
            }
        }

        if let Some(state) = filter_value(state_code) {
            result.states.retain(|s| s.code == state);
        }

        result
    }
}
