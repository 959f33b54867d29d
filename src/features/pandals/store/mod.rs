//! Persistence boundary for pandals.
//!
//! The store owns no business rules: it evaluates the predicates and updates it
//! is handed. The one exception is [`PandalStore::record_approval`], which must
//! apply a vote as a single atomic conditional update so that concurrent votes
//! never lose or double-count each other.

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::pandals::models::{
    ApprovalOutcome, DistrictCount, DistrictFilter, Pandal, PandalFilter, PandalUpdate,
};

#[cfg(test)]
mod memory;
mod postgres;

#[cfg(test)]
pub use memory::InMemoryPandalStore;
pub use postgres::PgPandalStore;

#[async_trait]
pub trait PandalStore: Send + Sync {
    /// Insert a fully formed entry and return its identifier
    async fn create(&self, pandal: &Pandal) -> Result<Uuid>;

    /// Entries matching the filter; nearest first when a proximity predicate is
    /// present, newest first otherwise. Empty when nothing matches.
    async fn find_all(&self, filter: &PandalFilter) -> Result<Vec<Pandal>>;

    /// `AppError::NotFound` when no entry has this id
    async fn find_by_id(&self, id: Uuid) -> Result<Pandal>;

    /// Apply a partial update and return the stored entry. Used by moderation
    /// tooling outside the request path.
    #[allow(dead_code)]
    async fn update_by_id(&self, id: Uuid, update: &PandalUpdate) -> Result<Pandal>;

    /// Count entries per non-empty district, highest count first
    async fn aggregate_by_district(&self, filter: &DistrictFilter) -> Result<Vec<DistrictCount>>;

    /// In one atomic step: if the entry is pending and `approver` has not voted,
    /// append the approver, increment the count and promote to approved when the
    /// new count reaches `required_approvals`.
    async fn record_approval(
        &self,
        id: Uuid,
        approver: &str,
        required_approvals: i32,
    ) -> Result<ApprovalOutcome>;
}
