use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Farms, their cows and the inseminators that serve them.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inseminator::Table)
                    .if_not_exists()
                    .col(pk_auto(Inseminator::Id))
                    .col(string(Inseminator::Name))
                    .col(string_len(Inseminator::PhoneNumber, 15))
                    .col(text(Inseminator::Address))
                    .col(boolean(Inseminator::IsActive).default(true))
                    .col(boolean(Inseminator::IsDeleted).default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Farm::Table)
                    .if_not_exists()
                    .col(string_len(Farm::FarmId, 50).primary_key())
                    .col(string(Farm::OwnerName))
                    .col(text(Farm::Address))
                    .col(string_len(Farm::TelephoneNumber, 15))
                    .col(integer_null(Farm::InseminatorId))
                    .col(boolean(Farm::IsDeleted).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farm_inseminator")
                            .from(Farm::Table, Farm::InseminatorId)
                            .to(Inseminator::Table, Inseminator::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cow::Table)
                    .if_not_exists()
                    .col(pk_auto(Cow::Id))
                    .col(string_len(Cow::FarmId, 50))
                    .col(string_len(Cow::CowId, 50))
                    .col(integer(Cow::LactationNumber).default(0))
                    .col(integer(Cow::NumberOfInseminations).default(0))
                    .col(boolean(Cow::IsDeleted).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cow_farm")
                            .from(Cow::Table, Cow::FarmId)
                            .to(Farm::Table, Farm::FarmId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A cow tag is only unique within its farm.
        manager
            .create_index(
                Index::create()
                    .name("idx_cow_farm_tag_unique")
                    .table(Cow::Table)
                    .col(Cow::FarmId)
                    .col(Cow::CowId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cow::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Farm::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inseminator::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Inseminator {
    Table,
    Id,
    Name,
    PhoneNumber,
    Address,
    IsActive,
    IsDeleted,
}

#[derive(Iden)]
pub enum Farm {
    Table,
    FarmId,
    OwnerName,
    Address,
    TelephoneNumber,
    InseminatorId,
    IsDeleted,
}

#[derive(Iden)]
pub enum Cow {
    Table,
    Id,
    FarmId,
    CowId,
    LactationNumber,
    NumberOfInseminations,
    IsDeleted,
}
