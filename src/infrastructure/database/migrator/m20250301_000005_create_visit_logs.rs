//! Create visit_logs table
//!
//! Care visit records. The author columns are creation-time snapshots and
//! are never touched by later profile edits. Mood tags are stored as a JSON
//! array in a TEXT column.

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_clients::Clients;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VisitLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VisitLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VisitLogs::ClientId).string().not_null())
                    .col(ColumnDef::new(VisitLogs::CarerName).string().not_null())
                    .col(ColumnDef::new(VisitLogs::CarerNumber).string())
                    .col(
                        ColumnDef::new(VisitLogs::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VisitLogs::PersonalCareCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VisitLogs::CareRemindersProvided)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VisitLogs::Toilet)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VisitLogs::ChangedClothes)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(VisitLogs::AteFood).string().not_null())
                    .col(ColumnDef::new(VisitLogs::Notes).text().not_null())
                    .col(ColumnDef::new(VisitLogs::Mood).text().not_null())
                    .col(ColumnDef::new(VisitLogs::LastUpdatedBy).string())
                    .col(
                        ColumnDef::new(VisitLogs::LastUpdatedAt).timestamp_with_time_zone(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visit_logs_client")
                            .from(VisitLogs::Table, VisitLogs::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_visit_logs_client")
                    .table(VisitLogs::Table)
                    .col(VisitLogs::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_visit_logs_date")
                    .table(VisitLogs::Table)
                    .col(VisitLogs::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VisitLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum VisitLogs {
    Table,
    Id,
    ClientId,
    CarerName,
    CarerNumber,
    Date,
    PersonalCareCompleted,
    CareRemindersProvided,
    Toilet,
    ChangedClothes,
    AteFood,
    Notes,
    Mood,
    LastUpdatedBy,
    LastUpdatedAt,
}
