//! SeaORM implementation of AssignmentRepository

use std::collections::HashSet;

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};

use crate::domain::assignment::{AssignOutcome, AssignmentRepository, UnassignOutcome};
use crate::domain::audit::AuditEntry;
use crate::domain::user::User;
use crate::domain::{CareError, CareResult};
use crate::infrastructure::database::entities::{assignment, user};

use super::{audit_row, db_err, tx_err};

pub struct SeaOrmAssignmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAssignmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn user_model_to_domain(m: user::Model) -> User {
    User {
        email: m.email,
        password_hash: m.password_hash,
        role: match m.role {
            user::UserRole::Admin => crate::domain::Role::Admin,
            user::UserRole::Manager => crate::domain::Role::Manager,
            user::UserRole::Carer => crate::domain::Role::Carer,
            user::UserRole::Family => crate::domain::Role::Family,
        },
        name: m.name,
        phone: m.phone,
        department: m.department,
        family_id: m.family_id,
    }
}

// ── AssignmentRepository impl ───────────────────────────────────

#[async_trait]
impl AssignmentRepository for SeaOrmAssignmentRepository {
    async fn link(
        &self,
        user_email: &str,
        client_id: &str,
        audit: AuditEntry,
    ) -> CareResult<AssignOutcome> {
        let existing = assignment::Entity::find_by_id((user_email.to_string(), client_id.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Ok(AssignOutcome::AlreadyAssigned);
        }

        debug!("Linking {} -> {}", user_email, client_id);

        let model = assignment::ActiveModel {
            user_email: Set(user_email.to_string()),
            client_id: Set(client_id.to_string()),
        };
        let trail = audit_row(audit);

        let outcome = self
            .db
            .transaction::<_, AssignOutcome, CareError>(|txn| {
                Box::pin(async move {
                    // A concurrent link can still win the insert; the key
                    // collision means the edge exists, which is the goal.
                    match model.insert(txn).await {
                        Ok(_) => {}
                        Err(e) => {
                            return match e.sql_err() {
                                Some(SqlErr::UniqueConstraintViolation(_)) => {
                                    Ok(AssignOutcome::AlreadyAssigned)
                                }
                                _ => Err(db_err(e)),
                            }
                        }
                    }
                    trail.insert(txn).await.map_err(db_err)?;
                    Ok(AssignOutcome::Assigned)
                })
            })
            .await
            .map_err(tx_err)?;
        Ok(outcome)
    }

    async fn unlink(
        &self,
        user_email: &str,
        client_id: &str,
        audit: AuditEntry,
    ) -> CareResult<UnassignOutcome> {
        let existing = assignment::Entity::find_by_id((user_email.to_string(), client_id.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Ok(UnassignOutcome::NotAssigned);
        }

        debug!("Unlinking {} -> {}", user_email, client_id);

        let key = (user_email.to_string(), client_id.to_string());
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    assignment::Entity::delete_by_id(key)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    trail.insert(txn).await.map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)?;
        Ok(UnassignOutcome::Unassigned)
    }

    async fn client_ids_for(&self, user_email: &str) -> CareResult<HashSet<String>> {
        let edges = assignment::Entity::find()
            .filter(assignment::Column::UserEmail.eq(user_email))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(edges.into_iter().map(|e| e.client_id).collect())
    }

    async fn users_for_client(&self, client_id: &str) -> CareResult<Vec<User>> {
        let rows = assignment::Entity::find()
            .filter(assignment::Column::ClientId.eq(client_id))
            .order_by_asc(assignment::Column::UserEmail)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .filter_map(|(_, u)| u)
            .map(user_model_to_domain)
            .collect())
    }
}
