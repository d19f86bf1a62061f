use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260901_000000_create_farm_tables::{Cow, Farm};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Every SMS the system attempts is recorded here; scheduled alerts also use
/// it as their dedup fence.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Message::Table)
                    .if_not_exists()
                    .col(pk_auto(Message::Id))
                    .col(string_len(Message::FarmId, 50))
                    .col(integer_null(Message::CowId))
                    .col(text(Message::MessageText))
                    .col(
                        ColumnDef::new(Message::MessageType)
                            .string_len(50)
                            .not_null()
                            .comment("snake_case message kind, e.g. 'calving_due_alert'"),
                    )
                    .col(
                        timestamp_with_time_zone(Message::SentDate)
                            .default(Expr::current_timestamp()),
                    )
                    .col(boolean(Message::IsSent).default(false))
                    .col(boolean(Message::IsDeleted).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_farm")
                            .from(Message::Table, Message::FarmId)
                            .to(Farm::Table, Farm::FarmId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_cow")
                            .from(Message::Table, Message::CowId)
                            .to(Cow::Table, Cow::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("idx_message_sent_date")
                            .col(Message::SentDate),
                    )
                    .index(
                        Index::create()
                            .name("idx_message_cow_type")
                            .col(Message::CowId)
                            .col(Message::MessageType),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Message::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Message {
    Table,
    Id,
    FarmId,
    CowId,
    MessageText,
    MessageType,
    SentDate,
    IsSent,
    IsDeleted,
}
