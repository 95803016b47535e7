//! SeaORM implementation of ClientRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};

use crate::domain::audit::AuditEntry;
use crate::domain::client::{Client, ClientRepository, UpdateClientDto};
use crate::domain::{CareError, CareResult};
use crate::infrastructure::database::entities::client;

use super::{audit_row, db_err, tx_err};

pub struct SeaOrmClientRepository {
    db: DatabaseConnection,
}

impl SeaOrmClientRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: client::Model) -> Client {
    Client {
        id: m.id,
        name: m.name,
        age: m.age,
        room: m.room,
        date_of_birth: m.date_of_birth,
        support_needs: m.support_needs,
    }
}

fn domain_to_model(c: &Client) -> client::ActiveModel {
    client::ActiveModel {
        id: Set(c.id.clone()),
        name: Set(c.name.clone()),
        age: Set(c.age),
        room: Set(c.room.clone()),
        date_of_birth: Set(c.date_of_birth),
        support_needs: Set(c.support_needs.clone()),
    }
}

// ── ClientRepository impl ───────────────────────────────────────

#[async_trait]
impl ClientRepository for SeaOrmClientRepository {
    async fn insert(&self, client: Client, audit: AuditEntry) -> CareResult<()> {
        debug!("Inserting client: {}", client.id);

        let id = client.id.clone();
        let model = domain_to_model(&client);
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    model.insert(txn).await.map_err(|e| match e.sql_err() {
                        Some(SqlErr::UniqueConstraintViolation(_)) => {
                            CareError::Validation(format!("client '{id}' already exists"))
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

    async fn find_by_id(&self, id: &str) -> CareResult<Option<Client>> {
        let model = client::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn exists(&self, id: &str) -> CareResult<bool> {
        let model = client::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.is_some())
    }

    async fn list(&self) -> CareResult<Vec<Client>> {
        let models = client::Entity::find()
            .order_by_asc(client::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(
        &self,
        id: &str,
        dto: UpdateClientDto,
        audit: AuditEntry,
    ) -> CareResult<Client> {
        debug!("Updating client: {}", id);

        let existing = client::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(CareError::not_found("client", "id", id));
        };

        let mut updated = model_to_domain(existing);
        if let Some(name) = dto.name {
            updated.name = name;
        }
        if let Some(age) = dto.age {
            updated.age = age;
        }
        if let Some(room) = dto.room {
            updated.room = room;
        }
        if let Some(date_of_birth) = dto.date_of_birth {
            updated.date_of_birth = date_of_birth;
        }
        if let Some(support_needs) = dto.support_needs {
            updated.support_needs = Some(support_needs);
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

    async fn delete_cascading(&self, id: &str, audit: AuditEntry) -> CareResult<()> {
        debug!("Deleting client: {}", id);

        let existing = client::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(CareError::not_found("client", "id", id));
        }

        // Edges, schedules and visit logs follow via the schema cascade.
        let id = id.to_string();
        let trail = audit_row(audit);

        self.db
            .transaction::<_, (), CareError>(|txn| {
                Box::pin(async move {
                    client::Entity::delete_by_id(&id)
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
