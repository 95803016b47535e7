//! SeaORM implementation of AuditRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};

use crate::domain::audit::{AuditEntry, AuditRepository};
use crate::domain::CareResult;
use crate::infrastructure::database::entities::audit_log;

use super::{audit_row, db_err};

pub struct SeaOrmAuditRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuditRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: audit_log::Model) -> AuditEntry {
    AuditEntry {
        actor: m.actor,
        action: m.action,
        entity_type: m.entity_type,
        entity_id: m.entity_id,
        timestamp: m.timestamp,
    }
}

#[async_trait]
impl AuditRepository for SeaOrmAuditRepository {
    async fn append(&self, entry: AuditEntry) -> CareResult<()> {
        audit_row(entry).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn recent(&self, limit: u64) -> CareResult<Vec<AuditEntry>> {
        // The integer key breaks ties between same-timestamp entries.
        let models = audit_log::Entity::find()
            .order_by_desc(audit_log::Column::Timestamp)
            .order_by_desc(audit_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
