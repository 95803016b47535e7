use async_trait::async_trait;

use chrono::{DateTime, NaiveDate, Utc};

use super::{Schedule, ScheduleFilter, ScheduleStatus, UpdateScheduleDto};
use crate::domain::audit::AuditEntry;
use crate::domain::error::CareResult;

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn insert(&self, schedule: Schedule, audit: AuditEntry) -> CareResult<()>;

    async fn find_by_id(&self, id: &str) -> CareResult<Option<Schedule>>;

    /// Scoped lookup for owning carers: misses unless both id and owner match.
    async fn find_by_id_for_carer(
        &self,
        id: &str,
        carer_email: &str,
    ) -> CareResult<Option<Schedule>>;

    /// Same-carer, same-date schedules still counting towards conflicts
    /// (status scheduled or in_progress).
    async fn find_active_for_carer_date(
        &self,
        carer_email: &str,
        date: NaiveDate,
    ) -> CareResult<Vec<Schedule>>;

    /// Filtered listing, always ordered ascending by (date, start_time).
    async fn list(&self, filter: ScheduleFilter) -> CareResult<Vec<Schedule>>;

    async fn update(
        &self,
        id: &str,
        dto: UpdateScheduleDto,
        audit: AuditEntry,
    ) -> CareResult<Schedule>;

    async fn set_status(
        &self,
        id: &str,
        status: ScheduleStatus,
        completed_at: Option<DateTime<Utc>>,
        audit: AuditEntry,
    ) -> CareResult<Schedule>;

    async fn delete(&self, id: &str, audit: AuditEntry) -> CareResult<()>;
}
