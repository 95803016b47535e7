use async_trait::async_trait;

use super::{Client, UpdateClientDto};
use crate::domain::audit::AuditEntry;
use crate::domain::error::CareResult;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Insert a new resident. A duplicate id is a `Validation` error.
    async fn insert(&self, client: Client, audit: AuditEntry) -> CareResult<()>;

    async fn find_by_id(&self, id: &str) -> CareResult<Option<Client>>;

    async fn exists(&self, id: &str) -> CareResult<bool>;

    /// All residents, ordered by name.
    async fn list(&self) -> CareResult<Vec<Client>>;

    async fn update(&self, id: &str, dto: UpdateClientDto, audit: AuditEntry)
        -> CareResult<Client>;

    /// Delete the resident and everything referencing them: assignment
    /// edges, schedules, visit logs.
    async fn delete_cascading(&self, id: &str, audit: AuditEntry) -> CareResult<()>;
}
