use crate::error::ApiResult;
use crate::models::CategoryTree;
use async_trait::async_trait;

/// Source of category tree snapshots.
///
/// A provider always returns the whole tree. The resolver treats every
/// snapshot as immutable and rebuilds its index from scratch when a new one
/// arrives, so implementations need not support partial or incremental loads.
///
/// Failures are surfaced to the host as-is; the resolver never retries and
/// keeps operating on the last snapshot it installed.
#[async_trait]
pub trait TreeProvider: Send + Sync {
    /// Fetch the complete category tree.
    async fn fetch_tree(&self) -> ApiResult<CategoryTree>;
}
