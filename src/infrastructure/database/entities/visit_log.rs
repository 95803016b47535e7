//! Visit log entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "visit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub client_id: String,

    /// Author snapshot captured at creation; never rewritten afterwards.
    pub carer_name: String,
    #[sea_orm(nullable)]
    pub carer_number: Option<String>,

    pub date: DateTimeUtc,
    pub personal_care_completed: bool,
    pub care_reminders_provided: String,
    pub toilet: bool,
    pub changed_clothes: bool,
    pub ate_food: String,
    pub notes: String,

    /// JSON array of mood tags, e.g. `["content","tired"]`.
    #[sea_orm(column_type = "Text")]
    pub mood: String,

    #[sea_orm(nullable)]
    pub last_updated_by: Option<String>,
    #[sea_orm(nullable)]
    pub last_updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
