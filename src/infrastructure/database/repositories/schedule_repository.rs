//! SeaORM implementation of ScheduleRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};

use crate::domain::audit::AuditEntry;
use crate::domain::schedule::{
    Schedule, ScheduleFilter, ScheduleRepository, ScheduleStatus, UpdateScheduleDto,
};
use crate::domain::{CareError, CareResult};
use crate::infrastructure::database::entities::schedule;

use super::{audit_row, db_err, tx_err};

pub struct SeaOrmScheduleRepository {
    db: DatabaseConnection,
}

impl SeaOrmScheduleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: schedule::Model) -> CareResult<Schedule> {
    let status = m.status.parse::<ScheduleStatus>().map_err(|_| {
        CareError::Store(format!(
            "schedule {} carries unknown status '{}'",
            m.id, m.status
        ))
    })?;
    Ok(Schedule {
        id: m.id,
        carer_email: m.carer_email,
        client_id: m.client_id,
        date: m.date,
        start_time: m.start_time,
        end_time: m.end_time,
        shift_type: m.shift_type,
        status,
        notes: m.notes,
        created_by: m.created_by,
        created_at: m.created_at,
        completed_at: m.completed_at,
    })
}

fn domain_to_model(s: &Schedule) -> schedule::ActiveModel {
    schedule::ActiveModel {
        id: Set(s.id.clone()),
        carer_email: Set(s.carer_email.clone()),
        client_id: Set(s.client_id.clone()),
        date: Set(s.date),
        start_time: Set(s.start_time),
        end_time: Set(s.end_time),
        shift_type: Set(s.shift_type.clone()),
        status: Set(s.status.as_str().to_string()),
        notes: Set(s.notes.clone()),
        created_by: Set(s.created_by.clone()),
        created_at: Set(s.created_at),
        completed_at: Set(s.completed_at),
    }
}

// ── ScheduleRepository impl ─────────────────────────────────────

#[async_trait]
impl ScheduleRepository for SeaOrmScheduleRepository {
    async fn insert(&self, s: Schedule, audit: AuditEntry) -> CareResult<()> {
        debug!("Inserting schedule: {}", s.id);

        let id = s.id.clone();
        let model = domain_to_model(&s);
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    model.insert(txn).await.map_err(|e| match e.sql_err() {
                        Some(SqlErr::UniqueConstraintViolation(_)) => {
                            CareError::Validation(format!("schedule '{id}' already exists"))
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

    async fn find_by_id(&self, id: &str) -> CareResult<Option<Schedule>> {
        let model = schedule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_id_for_carer(
        &self,
        id: &str,
        carer_email: &str,
    ) -> CareResult<Option<Schedule>> {
        let model = schedule::Entity::find()
            .filter(schedule::Column::Id.eq(id))
            .filter(schedule::Column::CarerEmail.eq(carer_email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_active_for_carer_date(
        &self,
        carer_email: &str,
        date: NaiveDate,
    ) -> CareResult<Vec<Schedule>> {
        let active: Vec<&str> = ScheduleStatus::ALL
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.as_str())
            .collect();
        let models = schedule::Entity::find()
            .filter(schedule::Column::CarerEmail.eq(carer_email))
            .filter(schedule::Column::Date.eq(date))
            .filter(schedule::Column::Status.is_in(active))
            .order_by_asc(schedule::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn list(&self, filter: ScheduleFilter) -> CareResult<Vec<Schedule>> {
        let mut query = schedule::Entity::find();
        if let Some(carer_email) = filter.carer_email {
            query = query.filter(schedule::Column::CarerEmail.eq(carer_email));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(schedule::Column::ClientId.eq(client_id));
        }
        if let Some(date) = filter.date {
            query = query.filter(schedule::Column::Date.eq(date));
        }
        if let Some(from_date) = filter.from_date {
            query = query.filter(schedule::Column::Date.gte(from_date));
        }
        if let Some(status) = filter.status {
            query = query.filter(schedule::Column::Status.eq(status.as_str()));
        }

        let models = query
            .order_by_asc(schedule::Column::Date)
            .order_by_asc(schedule::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn update(
        &self,
        id: &str,
        dto: UpdateScheduleDto,
        audit: AuditEntry,
    ) -> CareResult<Schedule> {
        debug!("Updating schedule: {}", id);

        let existing = schedule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(CareError::not_found("schedule", "id", id));
        };

        let mut updated = model_to_domain(existing)?;
        if let Some(carer_email) = dto.carer_email {
            updated.carer_email = carer_email;
        }
        if let Some(client_id) = dto.client_id {
            updated.client_id = client_id;
        }
        if let Some(date) = dto.date {
            updated.date = date;
        }
        if let Some(start_time) = dto.start_time {
            updated.start_time = start_time;
        }
        if let Some(end_time) = dto.end_time {
            updated.end_time = end_time;
        }
        if let Some(shift_type) = dto.shift_type {
            updated.shift_type = shift_type;
        }
        if let Some(notes) = dto.notes {
            updated.notes = Some(notes);
        }

        let model = domain_to_model(&updated);
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

    async fn set_status(
        &self,
        id: &str,
        status: ScheduleStatus,
        completed_at: Option<DateTime<Utc>>,
        audit: AuditEntry,
    ) -> CareResult<Schedule> {
        debug!("Setting schedule {} status to {}", id, status);

        let existing = schedule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(CareError::not_found("schedule", "id", id));
        };

        let mut updated = model_to_domain(existing)?;
        updated.status = status;
        if let Some(ts) = completed_at {
            updated.completed_at = Some(ts);
        }

        let model = domain_to_model(&updated);
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

    async fn delete(&self, id: &str, audit: AuditEntry) -> CareResult<()> {
        debug!("Deleting schedule: {}", id);

        let existing = schedule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(CareError::not_found("schedule", "id", id));
        }

        let id = id.to_string();
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    schedule::Entity::delete_by_id(&id)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    trail.insert(txn).await.map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)
    }
}
