use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260901_000000_create_farm_tables::{Cow, Farm};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reproduction::Table)
                    .if_not_exists()
                    .col(pk_auto(Reproduction::Id))
                    .col(string_len(Reproduction::FarmId, 50))
                    .col(integer(Reproduction::CowId))
                    .col(timestamp_with_time_zone_null(Reproduction::HeatSignStart))
                    .col(text_null(Reproduction::HeatSignsSeen))
                    .col(timestamp_with_time_zone_null(
                        Reproduction::HeatSignRecordedAt,
                    ))
                    .col(boolean(Reproduction::IsCowPregnant).default(false))
                    .col(date_null(Reproduction::PregnancyDate))
                    .col(
                        date_null(Reproduction::CalvingDate)
                            .comment("Expected calving date while pregnant"),
                    )
                    .col(boolean(Reproduction::IsDeleted).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reproduction_farm")
                            .from(Reproduction::Table, Reproduction::FarmId)
                            .to(Farm::Table, Farm::FarmId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reproduction_cow")
                            .from(Reproduction::Table, Reproduction::CowId)
                            .to(Cow::Table, Cow::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("idx_reproduction_pregnant")
                            .col(Reproduction::IsCowPregnant),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reproduction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reproduction {
    Table,
    Id,
    FarmId,
    CowId,
    HeatSignStart,
    HeatSignsSeen,
    HeatSignRecordedAt,
    IsCowPregnant,
    PregnancyDate,
    CalvingDate,
    IsDeleted,
}
