//! Append-only audit trail entries.

use chrono::{DateTime, Utc};

/// One line in the audit trail: who did what to which record, when.
/// Exactly these five fields; payloads never go in the trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn created(actor: &str, entity_type: &str, entity_id: &str) -> Self {
        Self::new(actor, "created", entity_type, entity_id)
    }

    pub fn updated(actor: &str, entity_type: &str, entity_id: &str) -> Self {
        Self::new(actor, "updated", entity_type, entity_id)
    }

    pub fn deleted(actor: &str, entity_type: &str, entity_id: &str) -> Self {
        Self::new(actor, "deleted", entity_type, entity_id)
    }

    pub fn assigned(actor: &str, edge_id: &str) -> Self {
        Self::new(actor, "assigned", "assignment", edge_id)
    }

    pub fn unassigned(actor: &str, edge_id: &str) -> Self {
        Self::new(actor, "unassigned", "assignment", edge_id)
    }
}
