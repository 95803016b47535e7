use std::collections::HashSet;

use async_trait::async_trait;

use super::{AssignOutcome, UnassignOutcome};
use crate::domain::audit::AuditEntry;
use crate::domain::error::CareResult;
use crate::domain::user::User;

/// Edge storage. `link`/`unlink` are idempotent: the audit entry is written
/// only when an edge is actually created or removed.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn link(
        &self,
        user_email: &str,
        client_id: &str,
        audit: AuditEntry,
    ) -> CareResult<AssignOutcome>;

    async fn unlink(
        &self,
        user_email: &str,
        client_id: &str,
        audit: AuditEntry,
    ) -> CareResult<UnassignOutcome>;

    /// Client ids a user is assigned to.
    async fn client_ids_for(&self, user_email: &str) -> CareResult<HashSet<String>>;

    /// Users assigned to a client, joined to their accounts.
    async fn users_for_client(&self, client_id: &str) -> CareResult<Vec<User>>;
}
