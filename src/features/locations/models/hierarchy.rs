use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// District (level 3) inside a state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdminDistrict {
    pub code: String,
    pub name: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// State or union territory (level 2)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdminState {
    pub code: String,
    pub name: String,
    /// Administrative type, e.g. "state" or "union_territory"
    #[serde(rename = "type")]
    pub state_type: String,
    pub iso_code: String,
    pub is_active: bool,
    #[serde(default)]
    pub districts: Vec<AdminDistrict>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdminCountry {
    pub code: String,
    pub name: String,
}

/// Country → State → District table as persisted on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdministrativeData {
    pub version: String,
    pub last_updated: String,
    pub country: AdminCountry,
    #[serde(default)]
    pub states: Vec<AdminState>,
}

#[derive(Debug, Error)]
pub enum LocationLoadError {
    #[error("could not read administrative data file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse administrative data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid administrative data: {0}")]
    Invalid(String),
}

impl AdministrativeData {
    pub fn load(path: &Path) -> Result<Self, LocationLoadError> {
        let bytes = std::fs::read(path).map_err(|source| LocationLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&bytes)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, LocationLoadError> {
        let data: AdministrativeData = serde_json::from_slice(bytes)?;
        data.check_unique_codes()?;
        Ok(data)
    }

    /// State codes are unique within the country, district codes unique within a state
    fn check_unique_codes(&self) -> Result<(), LocationLoadError> {
        let mut state_codes = HashSet::new();
        for state in &self.states {
            if !state_codes.insert(state.code.as_str()) {
                return Err(LocationLoadError::Invalid(format!(
                    "duplicate state code: {}",
                    state.code
                )));
            }

            let mut district_codes = HashSet::new();
            for district in &state.districts {
                if !district_codes.insert(district.code.as_str()) {
                    return Err(LocationLoadError::Invalid(format!(
                        "duplicate district code {} in state {}",
                        district.code, state.code
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn district_count(&self) -> usize {
        self.states.iter().map(|s| s.districts.len()).sum()
    }
}
