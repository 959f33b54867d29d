use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::locations::LocationValidator;
use crate::features::pandals::dtos::{
    CreatePandalDto, PandalResponseDto, PendingPandalsQuery, SearchPandalsQuery,
};
use crate::features::pandals::models::{Pandal, PandalFilter, PandalStatus};
use crate::features::pandals::services::PandalQueryBuilder;
use crate::features::pandals::store::PandalStore;
use crate::shared::deadline;

/// Service for submitting and searching pandals
pub struct PandalService {
    store: Arc<dyn PandalStore>,
    locations: LocationValidator,
    query_builder: PandalQueryBuilder,
    timeout: Duration,
}

impl PandalService {
    pub fn new(
        store: Arc<dyn PandalStore>,
        locations: LocationValidator,
        query_builder: PandalQueryBuilder,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            locations,
            query_builder,
            timeout,
        }
    }

    /// Submit a new entry. It always starts pending with no votes.
    pub async fn create(&self, dto: CreatePandalDto, creator: &str) -> Result<PandalResponseDto> {
        if creator.trim().is_empty() {
            return Err(AppError::Unauthorized(
                "A user identity is required to submit a pandal".to_string(),
            ));
        }

        self.locations
            .validate(&dto.country, &dto.state, &dto.district)?;

        let (lng, lat) = dto.location.lng_lat().ok_or_else(|| {
            AppError::Validation("Location coordinates must be [longitude, latitude]".to_string())
        })?;

        let now = Utc::now();
        let pandal = Pandal {
            id: Uuid::now_v7(),
            name: dto.name.trim().to_string(),
            description: dto.description.unwrap_or_default(),
            area: dto.area.trim().to_string(),
            theme: dto.theme.unwrap_or_default(),
            country: dto.country,
            state: dto.state,
            district: dto.district,
            lng,
            lat,
            images: dto.images.unwrap_or_default(),
            tags: dto.tags.unwrap_or_default(),
            rating_avg: 0.0,
            rating_count: 0,
            status: PandalStatus::Pending,
            approval_count: 0,
            approved_by: Vec::new(),
            created_by: creator.to_string(),
            created_at: dto.created_at.unwrap_or(now),
            updated_at: now,
        };

        deadline::within(self.timeout, "create pandal", self.store.create(&pandal)).await?;

        tracing::info!(
            "Pandal {} created by {} in {}/{}/{}",
            pandal.id,
            creator,
            pandal.country,
            pandal.state,
            pandal.district
        );

        Ok(pandal.into())
    }

    /// Approved entries matching the public search criteria
    pub async fn search_published(
        &self,
        query: &SearchPandalsQuery,
    ) -> Result<Vec<PandalResponseDto>> {
        let filter = self.query_builder.published(query)?;
        let pandals =
            deadline::within(self.timeout, "search pandals", self.store.find_all(&filter)).await?;
        Ok(Self::render(&filter, pandals))
    }

    /// Pending entries the requester neither created nor voted on
    pub async fn search_pending(
        &self,
        query: &PendingPandalsQuery,
        requester: &str,
    ) -> Result<Vec<PandalResponseDto>> {
        let filter = self.query_builder.moderation_queue(query, requester)?;
        let pandals = deadline::within(
            self.timeout,
            "list pending pandals",
            self.store.find_all(&filter),
        )
        .await?;
        Ok(Self::render(&filter, pandals))
    }

    fn render(filter: &PandalFilter, pandals: Vec<Pandal>) -> Vec<PandalResponseDto> {
        pandals
            .into_iter()
            .map(|p| {
                let distance = filter.proximity.map(|prox| prox.distance_to(&p));
                PandalResponseDto::from(p).with_distance(distance)
            })
            .collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PandalResponseDto> {
        let pandal =
            deadline::within(self.timeout, "get pandal", self.store.find_by_id(id)).await?;
        Ok(pandal.into())
    }
}
