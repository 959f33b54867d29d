use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Caller identity resolved from a validated access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Subject of the token; used as creator and approver identity
    pub user_id: String,
}
