use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::core::config::ConsensusConfig;
use crate::core::error::{AppError, Result};
use crate::features::pandals::dtos::PandalResponseDto;
use crate::features::pandals::models::{ApprovalOutcome, PandalStatus};
use crate::features::pandals::store::PandalStore;
use crate::shared::deadline;

/// Consensus engine: pending entries become approved once enough distinct
/// users have voted for them.
///
/// ```text
/// pending --vote(new approver, count+1 < T)--> pending
/// pending --vote(new approver, count+1 >= T)--> approved
/// approved --vote--> approved (no-op)
/// ```
///
/// A vote is applied by the store in one conditional step, so concurrent votes
/// from different users are all counted exactly once.
pub struct ApprovalService {
    store: Arc<dyn PandalStore>,
    required_approvals: i32,
    timeout: Duration,
}

impl ApprovalService {
    pub fn new(store: Arc<dyn PandalStore>, config: ConsensusConfig, timeout: Duration) -> Self {
        Self {
            store,
            required_approvals: config.required_approvals,
            timeout,
        }
    }

    pub fn required_approvals(&self) -> i32 {
        self.required_approvals
    }

    /// Register `approver`'s vote on a pending entry
    pub async fn approve(&self, id: Uuid, approver: &str) -> Result<PandalResponseDto> {
        let approver = approver.trim();
        if approver.is_empty() {
            return Err(AppError::Validation("Approver identity is required".to_string()));
        }

        let recorded = deadline::within(
            self.timeout,
            "record approval",
            self.store
                .record_approval(id, approver, self.required_approvals),
        )
        .await;

        let outcome = match recorded {
            Err(AppError::Timeout(reason)) => {
                return self.settle_expired_vote(id, approver, reason).await
            }
            other => other?,
        };

        match outcome {
            ApprovalOutcome::Recorded(pandal) => {
                if pandal.status == PandalStatus::Approved {
                    tracing::info!(
                        "Pandal {} approved with {} votes (threshold {})",
                        pandal.id,
                        pandal.approval_count,
                        self.required_approvals
                    );
                } else {
                    tracing::info!(
                        "Vote by {} recorded for pandal {} ({}/{})",
                        approver,
                        pandal.id,
                        pandal.approval_count,
                        self.required_approvals
                    );
                }
                Ok(pandal.into())
            }
            ApprovalOutcome::AlreadyApproved(pandal) => Ok(pandal.into()),
            ApprovalOutcome::DuplicateVote => {
                tracing::warn!("Duplicate vote by {} on pandal {}", approver, id);
                Err(AppError::Conflict(
                    "User has already approved this pandal".to_string(),
                ))
            }
            ApprovalOutcome::NotOpen(status) => {
                tracing::warn!("Vote by {} on {} pandal {} refused", approver, status, id);
                Err(AppError::Conflict(format!(
                    "Pandal is {} and not open for approval",
                    status
                )))
            }
            ApprovalOutcome::NotFound => {
                Err(AppError::NotFound(format!("Pandal {} not found", id)))
            }
        }
    }

    /// The vote statement may still have committed after the deadline fired.
    /// Report what the store holds: success if the vote is there, the timeout
    /// otherwise.
    async fn settle_expired_vote(
        &self,
        id: Uuid,
        approver: &str,
        reason: String,
    ) -> Result<PandalResponseDto> {
        let current =
            deadline::within(self.timeout, "re-read after vote", self.store.find_by_id(id)).await;

        match current {
            Ok(pandal) if pandal.has_vote_from(approver) => {
                tracing::warn!(
                    "Vote by {} on pandal {} landed after its deadline ({})",
                    approver,
                    id,
                    reason
                );
                Ok(pandal.into())
            }
            _ => Err(AppError::Timeout(reason)),
        }
    }
}
