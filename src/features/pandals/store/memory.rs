use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::pandals::models::{
    ApprovalOutcome, DistrictCount, DistrictFilter, Pandal, PandalFilter, PandalStatus,
    PandalUpdate,
};
use crate::features::pandals::store::PandalStore;

/// Map-backed store used by service and handler tests.
///
/// Every operation holds the lock for its whole duration, which gives the same
/// atomicity the PostgreSQL store gets from its conditional update.
#[derive(Default)]
pub struct InMemoryPandalStore {
    pandals: Mutex<HashMap<Uuid, Pandal>>,
}

impl InMemoryPandalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Pandal>>> {
        self.pandals
            .lock()
            .map_err(|_| AppError::Internal("pandal store lock poisoned".to_string()))
    }
}

/// Apply one vote in place and promote when the quorum is reached.
/// Status and duplicates are checked by the caller under the lock.
fn push_approval(pandal: &mut Pandal, approver: &str, required_approvals: i32) {
    pandal.approved_by.push(approver.to_string());
    pandal.approval_count += 1;
    if pandal.approval_count >= required_approvals {
        pandal.status = PandalStatus::Approved;
    }
    pandal.updated_at = chrono::Utc::now();
}

/// Evaluate every present criterion of the filter against one entry
fn matches(filter: &PandalFilter, pandal: &Pandal) -> bool {
    if pandal.status != filter.status {
        return false;
    }

    if let Some(proximity) = &filter.proximity {
        if proximity.distance_to(pandal) > proximity.radius_meters {
            return false;
        }
    }

    if let Some(tag) = &filter.tag {
        if !pandal.tags.iter().any(|t| t == tag) {
            return false;
        }
    }

    if let Some(text) = &filter.text {
        let needle = text.to_lowercase();
        let hit = [&pandal.name, &pandal.area, &pandal.district]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }

    if let Some(user) = &filter.exclude_user {
        if pandal.created_by == *user || pandal.has_vote_from(user) {
            return false;
        }
    }

    true
}

#[async_trait]
impl PandalStore for InMemoryPandalStore {
    async fn create(&self, pandal: &Pandal) -> Result<Uuid> {
        let mut pandals = self.lock()?;
        if pandals.contains_key(&pandal.id) {
            return Err(AppError::Conflict(format!(
                "Pandal {} already exists",
                pandal.id
            )));
        }
        pandals.insert(pandal.id, pandal.clone());
        Ok(pandal.id)
    }

    async fn find_all(&self, filter: &PandalFilter) -> Result<Vec<Pandal>> {
        let pandals = self.lock()?;
        let mut found: Vec<Pandal> = pandals
            .values()
            .filter(|p| matches(filter, p))
            .cloned()
            .collect();

        match &filter.proximity {
            Some(p) => found.sort_by(|a, b| p.distance_to(a).total_cmp(&p.distance_to(b))),
            None => found.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Pandal> {
        self.lock()?
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Pandal {} not found", id)))
    }

    async fn update_by_id(&self, id: Uuid, update: &PandalUpdate) -> Result<Pandal> {
        let mut pandals = self.lock()?;
        let pandal = pandals
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Pandal {} not found", id)))?;
        update.apply_to(pandal);
        Ok(pandal.clone())
    }

    async fn aggregate_by_district(&self, filter: &DistrictFilter) -> Result<Vec<DistrictCount>> {
        let pandals = self.lock()?;
        let mut counts: HashMap<&str, i64> = HashMap::new();

        for p in pandals.values() {
            if p.status != filter.status || p.district.is_empty() {
                continue;
            }
            if filter.country.as_ref().is_some_and(|c| *c != p.country) {
                continue;
            }
            if filter.state.as_ref().is_some_and(|s| *s != p.state) {
                continue;
            }
            *counts.entry(p.district.as_str()).or_default() += 1;
        }

        let mut rows: Vec<DistrictCount> = counts
            .into_iter()
            .map(|(district, pandal_count)| DistrictCount {
                district: district.to_string(),
                pandal_count,
            })
            .collect();
        // Ties by code so results are stable
        rows.sort_by(|a, b| {
            b.pandal_count
                .cmp(&a.pandal_count)
                .then_with(|| a.district.cmp(&b.district))
        });
        Ok(rows)
    }

    async fn record_approval(
        &self,
        id: Uuid,
        approver: &str,
        required_approvals: i32,
    ) -> Result<ApprovalOutcome> {
        let mut pandals = self.lock()?;
        let Some(pandal) = pandals.get_mut(&id) else {
            return Ok(ApprovalOutcome::NotFound);
        };

        let outcome = match pandal.status {
            PandalStatus::Approved => ApprovalOutcome::AlreadyApproved(pandal.clone()),
            PandalStatus::Pending if pandal.has_vote_from(approver) => {
                ApprovalOutcome::DuplicateVote
            }
            PandalStatus::Pending => {
                push_approval(pandal, approver, required_approvals);
                ApprovalOutcome::Recorded(pandal.clone())
            }
            status => ApprovalOutcome::NotOpen(status),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::features::pandals::models::Proximity;

    fn pandal(name: &str, district: &str, lng: f64, lat: f64, status: PandalStatus) -> Pandal {
        let now = Utc::now();
        Pandal {
            id: Uuid::now_v7(),
            name: name.to_string(),
            description: String::new(),
            area: String::new(),
            theme: String::new(),
            country: "IN".to_string(),
            state: "WB".to_string(),
            district: district.to_string(),
            lng,
            lat,
            images: vec![],
            tags: vec![],
            rating_avg: 0.0,
            rating_count: 0,
            status,
            approval_count: 0,
            approved_by: vec![],
            created_by: "creator".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_proximity_results_nearest_first() {
        let store = InMemoryPandalStore::new();
        let far = pandal("Far", "KOL", 88.40, 22.60, PandalStatus::Approved);
        let near = pandal("Near", "KOL", 88.3645, 22.5730, PandalStatus::Approved);
        let outside = pandal("Outside", "HWH", 89.5, 23.5, PandalStatus::Approved);
        for p in [&far, &near, &outside] {
            store.create(p).await.unwrap();
        }

        let mut filter = PandalFilter::with_status(PandalStatus::Approved);
        filter.proximity = Some(Proximity {
            lng: 88.3639,
            lat: 22.5726,
            radius_meters: 10_000.0,
        });

        let names: Vec<String> = store
            .find_all(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Near", "Far"]);
    }

    #[tokio::test]
    async fn test_tag_text_and_user_criteria() {
        let store = InMemoryPandalStore::new();
        let mut tagged = pandal("Bagbazar Sarbojanin", "KOL", 88.36, 22.60, PandalStatus::Pending);
        tagged.tags = vec!["heritage".to_string()];
        let mut voted = pandal("College Square", "KOL", 88.36, 22.57, PandalStatus::Pending);
        voted.approved_by = vec!["u1".to_string()];
        voted.approval_count = 1;
        let mut own = pandal("Santosh Mitra Square", "KOL", 88.37, 22.56, PandalStatus::Pending);
        own.created_by = "u1".to_string();
        for p in [&tagged, &voted, &own] {
            store.create(p).await.unwrap();
        }

        let mut filter = PandalFilter::with_status(PandalStatus::Pending);
        filter.tag = Some("heritage".to_string());
        let found = store.find_all(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, tagged.id);

        let mut filter = PandalFilter::with_status(PandalStatus::Pending);
        filter.text = Some("SQUARE".to_string());
        assert_eq!(store.find_all(&filter).await.unwrap().len(), 2);

        let mut filter = PandalFilter::with_status(PandalStatus::Pending);
        filter.exclude_user = Some("u1".to_string());
        let found = store.find_all(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, tagged.id);
    }

    #[tokio::test]
    async fn test_without_proximity_newest_first() {
        let store = InMemoryPandalStore::new();
        let mut old = pandal("Old", "KOL", 88.36, 22.57, PandalStatus::Approved);
        old.created_at = Utc::now() - Duration::days(2);
        let new = pandal("New", "KOL", 88.36, 22.57, PandalStatus::Approved);
        store.create(&old).await.unwrap();
        store.create(&new).await.unwrap();

        let found = store
            .find_all(&PandalFilter::with_status(PandalStatus::Approved))
            .await
            .unwrap();
        assert_eq!(found[0].name, "New");
        assert_eq!(found[1].name, "Old");
    }

    #[tokio::test]
    async fn test_aggregate_skips_empty_district_and_other_status() {
        let store = InMemoryPandalStore::new();
        for p in [
            pandal("a", "KOL", 88.3, 22.5, PandalStatus::Approved),
            pandal("b", "KOL", 88.3, 22.5, PandalStatus::Approved),
            pandal("c", "HWH", 88.3, 22.5, PandalStatus::Approved),
            pandal("d", "", 88.3, 22.5, PandalStatus::Approved),
            pandal("e", "HWH", 88.3, 22.5, PandalStatus::Pending),
        ] {
            store.create(&p).await.unwrap();
        }

        let rows = store
            .aggregate_by_district(&DistrictFilter {
                status: PandalStatus::Approved,
                country: None,
                state: None,
            })
            .await
            .unwrap();
        assert_eq!(
            rows,
            vec![
                DistrictCount {
                    district: "KOL".to_string(),
                    pandal_count: 2
                },
                DistrictCount {
                    district: "HWH".to_string(),
                    pandal_count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_record_approval_outcomes() {
        let store = InMemoryPandalStore::new();
        let p = pandal("p", "KOL", 88.3, 22.5, PandalStatus::Pending);
        store.create(&p).await.unwrap();

        let outcome = store.record_approval(p.id, "a", 1).await.unwrap();
        assert!(matches!(outcome, ApprovalOutcome::Recorded(ref x) if x.status == PandalStatus::Approved));

        let outcome = store.record_approval(p.id, "b", 1).await.unwrap();
        assert!(matches!(outcome, ApprovalOutcome::AlreadyApproved(ref x) if x.approval_count == 1));

        let rejected = pandal("r", "KOL", 88.3, 22.5, PandalStatus::Rejected);
        store.create(&rejected).await.unwrap();
        assert_eq!(
            store.record_approval(rejected.id, "a", 1).await.unwrap(),
            ApprovalOutcome::NotOpen(PandalStatus::Rejected)
        );

        assert_eq!(
            store.record_approval(Uuid::now_v7(), "a", 1).await.unwrap(),
            ApprovalOutcome::NotFound
        );
    }

    #[test]
    fn test_push_approval_promotes_at_quorum() {
        let mut p = pandal("p", "KOL", 88.3, 22.5, PandalStatus::Pending);
        push_approval(&mut p, "a", 2);
        assert_eq!(p.status, PandalStatus::Pending);
        assert_eq!(p.approval_count, 1);

        push_approval(&mut p, "b", 2);
        assert_eq!(p.status, PandalStatus::Approved);
        assert_eq!(p.approved_by, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_update_leaves_approval_bookkeeping_alone() {
        let store = InMemoryPandalStore::new();
        let mut p = pandal("p", "KOL", 88.3, 22.5, PandalStatus::Pending);
        p.approved_by = vec!["a".to_string()];
        p.approval_count = 1;
        store.create(&p).await.unwrap();

        let updated = store
            .update_by_id(
                p.id,
                &PandalUpdate {
                    rating_avg: Some(4.0),
                    rating_count: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.approval_count, updated.approved_by.len() as i32);
        assert_eq!(updated.approved_by, vec!["a"]);
        assert_eq!(updated.rating_count, 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryPandalStore::new();
        let err = store
            .update_by_id(Uuid::now_v7(), &PandalUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
