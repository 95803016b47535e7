use async_trait::async_trait;

use super::{User, UserPatch};
use crate::domain::audit::AuditEntry;
use crate::domain::error::CareResult;
use crate::domain::identity::Role;

/// Account storage. Mutating methods persist the change and the prepared
/// audit entry in one transaction.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. A duplicate email is a `Validation` error.
    async fn insert(&self, user: User, audit: AuditEntry) -> CareResult<()>;

    async fn find_by_email(&self, email: &str) -> CareResult<Option<User>>;

    async fn list_by_role(&self, role: Role) -> CareResult<Vec<User>>;

    /// Apply a patch to an existing account. `NotFound` if the email is unknown.
    async fn update(&self, email: &str, patch: UserPatch, audit: AuditEntry) -> CareResult<User>;

    /// Delete the account together with everything hanging off it: schedules
    /// owned by a carer and all assignment edges. Returns the client ids that
    /// lost this user, for reassignment.
    async fn delete_cascading(&self, email: &str, audit: AuditEntry) -> CareResult<Vec<String>>;
}
