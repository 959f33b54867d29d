use serde::Deserialize;
use utoipa::IntoParams;

/// Optional filters for the administrative geography endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AdministrativeQuery {
    /// Country code; a non-matching code returns the country with no states
    #[param(example = "IN")]
    pub country: Option<String>,

    /// State code; keeps only that state
    #[param(example = "WB")]
    pub state: Option<String>,
}
