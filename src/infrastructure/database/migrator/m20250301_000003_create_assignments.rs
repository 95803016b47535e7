//! Create assignments table
//!
//! User-to-client edges, one row per pair. The composite primary key makes
//! repeat assigns collide instead of duplicating. Rows disappear with either
//! endpoint via ON DELETE CASCADE.

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
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Assignments::UserEmail).string().not_null())
                    .col(ColumnDef::new(Assignments::ClientId).string().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_assignments")
                            .col(Assignments::UserEmail)
                            .col(Assignments::ClientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_user")
                            .from(Assignments::Table, Assignments::UserEmail)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_client")
                            .from(Assignments::Table, Assignments::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_client")
                    .table(Assignments::Table)
                    .col(Assignments::ClientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Assignments {
    Table,
    UserEmail,
    ClientId,
}
