//! Audit trail entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One appended trail row. The integer key is a storage detail; it orders
/// same-timestamp entries and never leaves the repository layer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
