use async_trait::async_trait;

use super::{UpdateVisitLogDto, VisitLog};
use crate::domain::audit::AuditEntry;
use crate::domain::error::CareResult;

/// Visit record storage. Lookups are keyed by (client, log) so scope gating
/// on the client happens before any record is touched.
#[async_trait]
pub trait VisitLogRepository: Send + Sync {
    /// Insert a new record. A duplicate id is a `Validation` error and the
    /// existing record stays untouched.
    async fn insert(&self, log: VisitLog, audit: AuditEntry) -> CareResult<()>;

    async fn exists(&self, id: &str) -> CareResult<bool>;

    async fn find(&self, client_id: &str, log_id: &str) -> CareResult<Option<VisitLog>>;

    /// All records for one client, newest visit first.
    async fn list_for_client(&self, client_id: &str) -> CareResult<Vec<VisitLog>>;

    async fn update(
        &self,
        client_id: &str,
        log_id: &str,
        dto: UpdateVisitLogDto,
        audit: AuditEntry,
    ) -> CareResult<VisitLog>;

    /// Remove a record, returning the removed payload.
    async fn delete(
        &self,
        client_id: &str,
        log_id: &str,
        audit: AuditEntry,
    ) -> CareResult<VisitLog>;
}
