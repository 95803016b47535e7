//! SeaORM repository implementations
//!
//! Every mutating method receives a prepared [`AuditEntry`] and commits it
//! in the same transaction as the entity change, so a trail row exists for
//! exactly the mutations that happened.

pub mod assignment_repository;
pub mod audit_repository;
pub mod client_repository;
pub mod repository_provider;
pub mod schedule_repository;
pub mod user_repository;
pub mod visit_log_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use log::error;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{DbErr, Set, TransactionError};

use crate::domain::audit::AuditEntry;
use crate::domain::CareError;

use super::entities::audit_log;

/// Map a database failure to the opaque store error, keeping the driver
/// detail in the server log.
pub(crate) fn db_err(e: DbErr) -> CareError {
    error!("Database error: {}", e);
    CareError::Store(e.to_string())
}

/// Flatten a transaction failure. Domain errors raised inside the closure
/// pass through unchanged.
pub(crate) fn tx_err(e: TransactionError<CareError>) -> CareError {
    match e {
        TransactionError::Connection(e) => db_err(e),
        TransactionError::Transaction(e) => e,
    }
}

/// Trail row for one mutation. The integer key is assigned by the database.
pub(crate) fn audit_row(entry: AuditEntry) -> audit_log::ActiveModel {
    audit_log::ActiveModel {
        id: NotSet,
        actor: Set(entry.actor),
        action: Set(entry.action),
        entity_type: Set(entry.entity_type),
        entity_id: Set(entry.entity_id),
        timestamp: Set(entry.timestamp),
    }
}
