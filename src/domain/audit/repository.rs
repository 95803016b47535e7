use async_trait::async_trait;

use super::AuditEntry;
use crate::domain::error::CareResult;

/// Append-only trail storage. Entries are never updated or removed.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> CareResult<()>;

    /// Most recent entries, descending by timestamp.
    async fn recent(&self, limit: u64) -> CareResult<Vec<AuditEntry>>;
}
