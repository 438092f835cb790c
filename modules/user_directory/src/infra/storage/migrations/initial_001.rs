use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    UserType,
    Phone,
    Age,
    Cpf,
    ZipCode,
    State,
    Address,
    Complement,
    NameFolded,
    EmailFolded,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ConsultantClients {
    Table,
    Id,
    ConsultantId,
    ClientId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Users::UserType)
                            .string_len(16)
                            .not_null()
                            .default("CLIENT"),
                    )
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::Age).string().null())
                    .col(ColumnDef::new(Users::Cpf).string().null())
                    .col(ColumnDef::new(Users::ZipCode).string().null())
                    .col(ColumnDef::new(Users::State).string().null())
                    .col(ColumnDef::new(Users::Address).string().null())
                    .col(ColumnDef::new(Users::Complement).string().null())
                    .col(ColumnDef::new(Users::NameFolded).string().not_null())
                    .col(ColumnDef::new(Users::EmailFolded).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_type_created_at")
                    .table(Users::Table)
                    .col(Users::UserType)
                    .col(Users::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConsultantClients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConsultantClients::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConsultantClients::ConsultantId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConsultantClients::ClientId).integer().not_null())
                    .col(
                        ColumnDef::new(ConsultantClients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_consultant_clients_consultant")
                            .from(ConsultantClients::Table, ConsultantClients::ConsultantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_consultant_clients_client")
                            .from(ConsultantClients::Table, ConsultantClients::ClientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_consultant_clients_pair")
                    .table(ConsultantClients::Table)
                    .col(ConsultantClients::ConsultantId)
                    .col(ConsultantClients::ClientId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConsultantClients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
