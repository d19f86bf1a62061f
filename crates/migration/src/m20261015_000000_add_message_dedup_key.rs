use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260901_000002_create_message_table::Message;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Adds the claim key used by the scheduled alerts so two overlapping runs
/// cannot both send the same alert on the same day.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Message::Table)
                    // '{cow}:{kind}:{date}' for scheduled alerts, NULL otherwise
                    .add_column(string_len_null(DedupKey::DedupKey, 128))
                    .to_owned(),
            )
            .await?;

        // NULLs never collide, so event-driven messages are unaffected.
        manager
            .create_index(
                Index::create()
                    .name("idx_message_dedup_key_unique")
                    .table(Message::Table)
                    .col(DedupKey::DedupKey)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_message_dedup_key_unique")
                    .table(Message::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Message::Table)
                    .drop_column(DedupKey::DedupKey)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum DedupKey {
    DedupKey,
}
