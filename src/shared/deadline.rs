use std::future::Future;
use std::time::Duration;

use crate::core::error::{AppError, Result};

/// Run a store operation under the per-request deadline.
///
/// An elapsed deadline fails the operation; there is no retry.
pub async fn within<T, F>(limit: Duration, operation: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(format!(
            "{} did not complete within {:?}",
            operation, limit
        ))),
    }
}
