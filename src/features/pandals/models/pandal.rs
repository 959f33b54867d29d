use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Publication state matching the `pandal_status` database enum.
///
/// `Rejected` is kept for moderation tooling; no operation in this service
/// moves an entry into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "pandal_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PandalStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for PandalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PandalStatus::Pending => write!(f, "pending"),
            PandalStatus::Approved => write!(f, "approved"),
            PandalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Database model for a pandal (point of interest)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Pandal {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub area: String,
    pub theme: String,
    pub country: String,
    pub state: String,
    pub district: String,
    pub lng: f64,
    pub lat: f64,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub status: PandalStatus,
    pub approval_count: i32,
    pub approved_by: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pandal {
    pub fn has_vote_from(&self, user_id: &str) -> bool {
        self.approved_by.iter().any(|u| u == user_id)
    }
}

/// Partial update applied by `PandalStore::update_by_id`; `None` leaves a column untouched.
///
/// `approval_count` and `approved_by` are not updatable here; they
/// only change through `PandalStore::record_approval`.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(dead_code)]
pub struct PandalUpdate {
    pub status: Option<PandalStatus>,
    pub rating_avg: Option<f64>,
    pub rating_count: Option<i32>,
}

#[allow(dead_code)]
impl PandalUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    #[cfg(test)]
    pub fn apply_to(&self, pandal: &mut Pandal) {
        if let Some(status) = self.status {
            pandal.status = status;
        }
        if let Some(avg) = self.rating_avg {
            pandal.rating_avg = avg;
        }
        if let Some(count) = self.rating_count {
            pandal.rating_count = count;
        }
        pandal.updated_at = Utc::now();
    }
}

/// Result of the store's single conditional vote operation
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// Vote appended; the entry may have been promoted to approved
    Recorded(Pandal),
    /// Entry was already approved; nothing changed
    AlreadyApproved(Pandal),
    /// Approver already appears in the approver list; nothing changed
    DuplicateVote,
    /// Entry is in a state that does not accept votes (rejected)
    NotOpen(PandalStatus),
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Pandal {
        let now = Utc::now();
        Pandal {
            id: Uuid::now_v7(),
            name: "Bagbazar Sarbojanin".to_string(),
            description: String::new(),
            area: "Bagbazar".to_string(),
            theme: String::new(),
            country: "IN".to_string(),
            state: "WB".to_string(),
            district: "KOL".to_string(),
            lng: 88.3639,
            lat: 22.5726,
            images: vec![],
            tags: vec![],
            rating_avg: 0.0,
            rating_count: 0,
            status: PandalStatus::Pending,
            approval_count: 0,
            approved_by: vec![],
            created_by: "creator".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_has_vote_from() {
        let mut pandal = pending();
        pandal.approved_by = vec!["a".to_string()];
        assert!(pandal.has_vote_from("a"));
        assert!(!pandal.has_vote_from("b"));
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut pandal = pending();
        let update = PandalUpdate {
            rating_avg: Some(4.5),
            rating_count: Some(2),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut pandal);

        assert_eq!(pandal.rating_avg, 4.5);
        assert_eq!(pandal.rating_count, 2);
        assert_eq!(pandal.status, PandalStatus::Pending);
        assert_eq!(pandal.approval_count, 0);
        assert!(pandal.approved_by.is_empty());
        assert!(PandalUpdate::default().is_empty());
    }

    #[test]
    fn test_status_display_matches_serde() {
        assert_eq!(PandalStatus::Approved.to_string(), "approved");
        assert_eq!(
            serde_json::to_value(PandalStatus::Rejected).unwrap(),
            serde_json::json!("rejected")
        );
    }
}
