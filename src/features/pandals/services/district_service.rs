use std::sync::Arc;
use std::time::Duration;

use crate::core::error::Result;
use crate::features::locations::LocationValidator;
use crate::features::pandals::dtos::DistrictSummaryDto;
use crate::features::pandals::models::{DistrictFilter, DistrictSummary, PandalStatus};
use crate::features::pandals::store::PandalStore;
use crate::shared::deadline;

/// Rolls approved pandals up per district, enriched from the location hierarchy
pub struct DistrictService {
    store: Arc<dyn PandalStore>,
    locations: LocationValidator,
    timeout: Duration,
}

fn filter_value(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl DistrictService {
    pub fn new(store: Arc<dyn PandalStore>, locations: LocationValidator, timeout: Duration) -> Self {
        Self {
            store,
            locations,
            timeout,
        }
    }

    pub async fn districts_summary(
        &self,
        country: Option<&str>,
        state: Option<&str>,
    ) -> Result<Vec<DistrictSummaryDto>> {
        let country = filter_value(country);
        let state = filter_value(state);

        let filter = DistrictFilter {
            status: PandalStatus::Approved,
            country: country.map(str::to_string),
            state: state.map(str::to_string),
        };

        let counts = deadline::within(
            self.timeout,
            "aggregate districts",
            self.store.aggregate_by_district(&filter),
        )
        .await?;

        Ok(counts
            .into_iter()
            .map(|row| {
                DistrictSummaryDto::from(DistrictSummary {
                    name: self.locations.lookup_name(country, state, &row.district),
                    image: self.locations.lookup_image(country, state, &row.district),
                    id: row.district,
                    pandal_count: row.pandal_count,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SearchConfig;
    use crate::features::pandals::models::PandalUpdate;
    use crate::features::pandals::services::{PandalQueryBuilder, PandalService};
    use crate::features::pandals::store::InMemoryPandalStore;
    use crate::shared::test_helpers::{create_dto, sample_location_validator};

    async fn seed(store: Arc<InMemoryPandalStore>, state: &str, district: &str, approved: bool) {
        let service = PandalService::new(
            store.clone(),
            sample_location_validator(),
            PandalQueryBuilder::new(SearchConfig::default()),
            Duration::from_secs(5),
        );
        let mut dto = create_dto();
        dto.state = state.to_string();
        dto.district = district.to_string();
        let created = service.create(dto, "creator").await.unwrap();

        if approved {
            store
                .update_by_id(
                    created.id,
                    &PandalUpdate {
                        status: Some(PandalStatus::Approved),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }
    }

    fn service(store: Arc<InMemoryPandalStore>) -> DistrictService {
        DistrictService::new(store, sample_location_validator(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_counts_only_approved_and_sorts_descending() {
        let store = Arc::new(InMemoryPandalStore::new());
        seed(store.clone(), "WB", "HWH", true).await;
        seed(store.clone(), "WB", "KOL", true).await;
        seed(store.clone(), "WB", "KOL", true).await;
        seed(store.clone(), "WB", "KOL", false).await;
        seed(store.clone(), "OD", "PUR", false).await;

        let rows = service(store).districts_summary(None, None).await.unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].id, "KOL");
        assert_eq!(rows[0].name, "Kolkata");
        assert_eq!(
            rows[0].image.as_deref(),
            Some("https://images.example.org/districts/kolkata.jpg")
        );
        assert_eq!(rows[0].pandal_count, 2);

        assert_eq!(rows[1].id, "HWH");
        assert_eq!(rows[1].name, "Howrah");
        assert!(rows[1].image.is_none());
    }

    #[tokio::test]
    async fn test_state_filter_narrows_before_grouping() {
        let store = Arc::new(InMemoryPandalStore::new());
        seed(store.clone(), "WB", "KOL", true).await;
        seed(store.clone(), "OD", "KHD", true).await;

        let rows = service(store)
            .districts_summary(Some("IN"), Some("OD"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "KHD");
        assert_eq!(rows[0].name, "Khordha");
    }

    #[tokio::test]
    async fn test_empty_store_gives_empty_rollup() {
        let rows = service(Arc::new(InMemoryPandalStore::new()))
            .districts_summary(None, Some(""))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
