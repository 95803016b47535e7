//! SeaORM implementation of VisitLogRepository
//!
//! Mood tags live in a TEXT column as a JSON array. A row that fails to
//! decode reads back as an empty tag list rather than poisoning the fetch.

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};

use crate::domain::audit::AuditEntry;
use crate::domain::visit_log::{UpdateVisitLogDto, VisitLog, VisitLogRepository};
use crate::domain::{CareError, CareResult};
use crate::infrastructure::database::entities::visit_log;

use super::{audit_row, db_err, tx_err};

pub struct SeaOrmVisitLogRepository {
    db: DatabaseConnection,
}

impl SeaOrmVisitLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: visit_log::Model) -> VisitLog {
    VisitLog {
        id: m.id,
        client_id: m.client_id,
        carer_name: m.carer_name,
        carer_number: m.carer_number,
        date: m.date,
        personal_care_completed: m.personal_care_completed,
        care_reminders_provided: m.care_reminders_provided,
        toilet: m.toilet,
        changed_clothes: m.changed_clothes,
        ate_food: m.ate_food,
        notes: m.notes,
        mood: serde_json::from_str(&m.mood).unwrap_or_default(),
        last_updated_by: m.last_updated_by,
        last_updated_at: m.last_updated_at,
    }
}

fn domain_to_model(log: &VisitLog) -> CareResult<visit_log::ActiveModel> {
    let mood = serde_json::to_string(&log.mood)
        .map_err(|e| CareError::Store(format!("mood encode failed: {e}")))?;
    Ok(visit_log::ActiveModel {
        id: Set(log.id.clone()),
        client_id: Set(log.client_id.clone()),
        carer_name: Set(log.carer_name.clone()),
        carer_number: Set(log.carer_number.clone()),
        date: Set(log.date),
        personal_care_completed: Set(log.personal_care_completed),
        care_reminders_provided: Set(log.care_reminders_provided.clone()),
        toilet: Set(log.toilet),
        changed_clothes: Set(log.changed_clothes),
        ate_food: Set(log.ate_food.clone()),
        notes: Set(log.notes.clone()),
        mood: Set(mood),
        last_updated_by: Set(log.last_updated_by.clone()),
        last_updated_at: Set(log.last_updated_at),
    })
}

// ── VisitLogRepository impl ─────────────────────────────────────

#[async_trait]
impl VisitLogRepository for SeaOrmVisitLogRepository {
    async fn insert(&self, log: VisitLog, audit: AuditEntry) -> CareResult<()> {
        debug!("Inserting visit log: {}", log.id);

        let id = log.id.clone();
        let model = domain_to_model(&log)?;
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    model.insert(txn).await.map_err(|e| match e.sql_err() {
                        Some(SqlErr::UniqueConstraintViolation(_)) => {
                            CareError::Validation(format!("visit log '{id}' already exists"))
                        }
                        _ => db_err(e),
                    })?;
                    trail.insert(txn).await.map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)
    }

    async fn exists(&self, id: &str) -> CareResult<bool> {
        let model = visit_log::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.is_some())
    }

    async fn find(&self, client_id: &str, log_id: &str) -> CareResult<Option<VisitLog>> {
        let model = visit_log::Entity::find()
            .filter(visit_log::Column::Id.eq(log_id))
            .filter(visit_log::Column::ClientId.eq(client_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_client(&self, client_id: &str) -> CareResult<Vec<VisitLog>> {
        let models = visit_log::Entity::find()
            .filter(visit_log::Column::ClientId.eq(client_id))
            .order_by_desc(visit_log::Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(
        &self,
        client_id: &str,
        log_id: &str,
        dto: UpdateVisitLogDto,
        audit: AuditEntry,
    ) -> CareResult<VisitLog> {
        debug!("Updating visit log: {}", log_id);

        let existing = visit_log::Entity::find()
            .filter(visit_log::Column::Id.eq(log_id))
            .filter(visit_log::Column::ClientId.eq(client_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(CareError::not_found("visit log", "id", log_id));
        };

        let mut updated = model_to_domain(existing);
        if let Some(date) = dto.date {
            updated.date = date;
        }
        if let Some(personal_care_completed) = dto.personal_care_completed {
            updated.personal_care_completed = personal_care_completed;
        }
        if let Some(care_reminders_provided) = dto.care_reminders_provided {
            updated.care_reminders_provided = care_reminders_provided;
        }
        if let Some(toilet) = dto.toilet {
            updated.toilet = toilet;
        }
        if let Some(changed_clothes) = dto.changed_clothes {
            updated.changed_clothes = changed_clothes;
        }
        if let Some(ate_food) = dto.ate_food {
            updated.ate_food = ate_food;
        }
        if let Some(notes) = dto.notes {
            updated.notes = notes;
        }
        if let Some(mood) = dto.mood {
            updated.mood = mood;
        }
        // Stamp from the trail entry so the two records agree on who and when.
        updated.last_updated_by = Some(audit.actor.clone());
        updated.last_updated_at = Some(audit.timestamp);

        let model = domain_to_model(&updated)?;
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    model.update(txn).await.map_err(db_err)?;
                    trail.insert(txn).await.map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)?;
        Ok(updated)
    }

    async fn delete(
        &self,
        client_id: &str,
        log_id: &str,
        audit: AuditEntry,
    ) -> CareResult<VisitLog> {
        debug!("Deleting visit log: {}", log_id);

        let existing = visit_log::Entity::find()
            .filter(visit_log::Column::Id.eq(log_id))
            .filter(visit_log::Column::ClientId.eq(client_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(CareError::not_found("visit log", "id", log_id));
        };

        let removed = model_to_domain(existing);
        let id = log_id.to_string();
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    visit_log::Entity::delete_by_id(&id)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    trail.insert(txn).await.map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)?;
        Ok(removed)
    }
}
