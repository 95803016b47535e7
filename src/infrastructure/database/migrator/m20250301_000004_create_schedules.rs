//! Create schedules table
//!
//! Shift bookings. The (carer_email, date) index backs the conflict scan
//! that runs on every booking.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users::Users;
use super::m20250301_000002_create_clients::Clients;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::CarerEmail).string().not_null())
                    .col(ColumnDef::new(Schedules::ClientId).string().not_null())
                    .col(ColumnDef::new(Schedules::Date).date().not_null())
                    .col(ColumnDef::new(Schedules::StartTime).time().not_null())
                    .col(ColumnDef::new(Schedules::EndTime).time().not_null())
                    .col(ColumnDef::new(Schedules::ShiftType).string().not_null())
                    .col(
                        ColumnDef::new(Schedules::Status)
                            .string_len(20)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(ColumnDef::new(Schedules::Notes).text())
                    .col(ColumnDef::new(Schedules::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Schedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::CompletedAt).timestamp_with_time_zone(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedules_carer")
                            .from(Schedules::Table, Schedules::CarerEmail)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedules_client")
                            .from(Schedules::Table, Schedules::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_carer_date")
                    .table(Schedules::Table)
                    .col(Schedules::CarerEmail)
                    .col(Schedules::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_client")
                    .table(Schedules::Table)
                    .col(Schedules::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_status")
                    .table(Schedules::Table)
                    .col(Schedules::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Schedules {
    Table,
    Id,
    CarerEmail,
    ClientId,
    Date,
    StartTime,
    EndTime,
    ShiftType,
    Status,
    Notes,
    CreatedBy,
    CreatedAt,
    CompletedAt,
}
