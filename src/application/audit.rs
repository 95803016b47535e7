//! Audit trail reads, plus lossy out-of-band recording.
//!
//! Entity mutations write their audit rows inside the repository
//! transaction, so the trail and the data cannot drift apart. `record` is
//! the other path: notes that must never fail the calling operation. A
//! failed append is logged and counted, and the call still succeeds.

use std::sync::Arc;

use tracing::warn;

use crate::domain::audit::AuditEntry;
use crate::domain::{CareResult, Identity, RepositoryProvider};

use super::access::require_management;

pub struct AuditTrail {
    repos: Arc<dyn RepositoryProvider>,
}

impl AuditTrail {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Append an entry on a best-effort basis. Storage failures are
    /// swallowed: the mutation this note describes has already happened,
    /// and losing the note must not un-happen it.
    pub async fn record(&self, actor: &str, action: &str, entity_type: &str, entity_id: &str) {
        let entry = AuditEntry::new(actor, action, entity_type, entity_id);
        if let Err(e) = self.repos.audit().append(entry).await {
            metrics::counter!("careview_audit_write_failures_total").increment(1);
            warn!(
                actor,
                action,
                entity_type,
                entity_id,
                error = %e,
                "audit write failed; continuing"
            );
        }
    }

    /// Newest entries first. Management-only.
    pub async fn recent(&self, caller: &Identity, limit: u64) -> CareResult<Vec<AuditEntry>> {
        require_management(caller)?;
        self.repos.audit().recent(limit).await
    }
}
