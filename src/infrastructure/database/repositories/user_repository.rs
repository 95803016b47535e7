//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};

use crate::domain::audit::AuditEntry;
use crate::domain::identity::Role;
use crate::domain::user::{User, UserPatch, UserRepository};
use crate::domain::{CareError, CareResult};
use crate::infrastructure::database::entities::{assignment, user};

use super::{audit_row, db_err, tx_err};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn role_to_db(role: Role) -> user::UserRole {
    match role {
        Role::Admin => user::UserRole::Admin,
        Role::Manager => user::UserRole::Manager,
        Role::Carer => user::UserRole::Carer,
        Role::Family => user::UserRole::Family,
    }
}

fn role_from_db(role: user::UserRole) -> Role {
    match role {
        user::UserRole::Admin => Role::Admin,
        user::UserRole::Manager => Role::Manager,
        user::UserRole::Carer => Role::Carer,
        user::UserRole::Family => Role::Family,
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        email: m.email,
        password_hash: m.password_hash,
        role: role_from_db(m.role),
        name: m.name,
        phone: m.phone,
        department: m.department,
        family_id: m.family_id,
    }
}

fn domain_to_model(u: &User) -> user::ActiveModel {
    user::ActiveModel {
        email: Set(u.email.clone()),
        password_hash: Set(u.password_hash.clone()),
        role: Set(role_to_db(u.role)),
        name: Set(u.name.clone()),
        phone: Set(u.phone.clone()),
        department: Set(u.department.clone()),
        family_id: Set(u.family_id.clone()),
    }
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(&self, user: User, audit: AuditEntry) -> CareResult<()> {
        debug!("Inserting user: {}", user.email);

        let email = user.email.clone();
        let model = domain_to_model(&user);
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    model.insert(txn).await.map_err(|e| match e.sql_err() {
                        Some(SqlErr::UniqueConstraintViolation(_)) => CareError::Validation(
                            format!("user with email '{email}' already exists"),
                        ),
                        _ => db_err(e),
                    })?;
                    trail.insert(txn).await.map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)
    }

    async fn find_by_email(&self, email: &str) -> CareResult<Option<User>> {
        let model = user::Entity::find_by_id(email)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_by_role(&self, role: Role) -> CareResult<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::Role.eq(role_to_db(role)))
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, email: &str, patch: UserPatch, audit: AuditEntry) -> CareResult<User> {
        debug!("Updating user: {}", email);

        let existing = user::Entity::find_by_id(email)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(CareError::not_found("user", "email", email));
        };

        let mut updated = model_to_domain(existing);
        if let Some(name) = patch.name {
            updated.name = Some(name);
        }
        if let Some(phone) = patch.phone {
            updated.phone = Some(phone);
        }
        if let Some(department) = patch.department {
            updated.department = Some(department);
        }
        if let Some(family_id) = patch.family_id {
            updated.family_id = Some(family_id);
        }
        if let Some(password_hash) = patch.password_hash {
            updated.password_hash = password_hash;
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

    async fn delete_cascading(&self, email: &str, audit: AuditEntry) -> CareResult<Vec<String>> {
        debug!("Deleting user: {}", email);

        let existing = user::Entity::find_by_id(email)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(CareError::not_found("user", "email", email));
        }

        // Edges and owned schedules go with the account via the schema
        // cascade; the touched client ids are collected first.
        let edges = assignment::Entity::find()
            .filter(assignment::Column::UserEmail.eq(email))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let client_ids: Vec<String> = edges.into_iter().map(|e| e.client_id).collect();

        let email = email.to_string();
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    user::Entity::delete_by_id(&email)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    trail.insert(txn).await.map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)?;
        Ok(client_ids)
    }
}
