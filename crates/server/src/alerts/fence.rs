//! Dedup fence for scheduled alerts.
//!
//! An alert kind is suppressed for a cow while a sent or claimed `message`
//! row of that kind exists inside the cooldown window. Before dispatching, a run claims
//! the alert by inserting a pending row under a unique per-day key; a second
//! run on the same day (e.g. a manual trigger overlapping the timer) finds
//! the key taken and skips. The claim is confirmed on successful delivery and
//! deleted otherwise, so a failed alert is retried on the next pass. A claim
//! that is still pending later (confirm failed, or the process died mid-send)
//! was at least attempted and keeps fencing the alert.

use crate::entity::message::{self, MessageType};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter,
};
use time::{Date, Duration, OffsetDateTime};

/// Claim key for one alert kind, one cow, one day.
pub fn dedup_key(cow_pk: i32, kind: MessageType, today: Date) -> String {
    format!("{cow_pk}:{}:{today}", kind.as_str())
}

/// Start of the trailing window: midnight UTC, `cooldown_days` before `today`.
/// A window reaching past the calendar range starts at [`Date::MIN`].
pub fn cooldown_cutoff(today: Date, cooldown_days: i64) -> OffsetDateTime {
    let start = cooldown_days
        .checked_mul(86_400)
        .map(Duration::seconds)
        .and_then(|window| today.checked_sub(window))
        .unwrap_or(Date::MIN);
    start.midnight().assume_utc()
}

/// Whether an alert of `kind` was delivered, or claimed and never released,
/// for this cow within the window.
#[tracing::instrument(skip(db))]
pub async fn recently_alerted<C: ConnectionTrait>(
    db: &C,
    farm_id: &str,
    cow_pk: i32,
    kind: MessageType,
    today: Date,
    cooldown_days: i64,
) -> Result<bool, DbErr> {
    let count = message::Entity::find()
        .filter(message::Column::FarmId.eq(farm_id))
        .filter(message::Column::CowId.eq(cow_pk))
        .filter(message::Column::MessageType.eq(kind.as_str()))
        .filter(
            Condition::any()
                .add(message::Column::IsSent.eq(true))
                .add(message::Column::DedupKey.is_not_null()),
        )
        .filter(message::Column::IsDeleted.eq(false))
        .filter(message::Column::SentDate.gte(cooldown_cutoff(today, cooldown_days)))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// A pending alert about to be dispatched.
#[derive(Debug, Clone)]
pub struct AlertClaim {
    pub key: String,
    pub farm_id: String,
    pub cow_pk: i32,
    pub kind: MessageType,
    pub message_text: String,
}

impl AlertClaim {
    pub fn new(
        farm_id: &str,
        cow_pk: i32,
        kind: MessageType,
        message_text: String,
        today: Date,
    ) -> Self {
        Self {
            key: dedup_key(cow_pk, kind, today),
            farm_id: farm_id.to_string(),
            cow_pk,
            kind,
            message_text,
        }
    }

    /// Inserts the pending row. Returns `false` if the key is already taken.
    #[tracing::instrument(skip(self, db), fields(key = %self.key))]
    pub async fn acquire<C: ConnectionTrait>(
        &self,
        db: &C,
        now: OffsetDateTime,
    ) -> Result<bool, DbErr> {
        let row = message::ActiveModel {
            id: ActiveValue::NotSet,
            farm_id: ActiveValue::Set(self.farm_id.clone()),
            cow_id: ActiveValue::Set(Some(self.cow_pk)),
            message_text: ActiveValue::Set(self.message_text.clone()),
            message_type: ActiveValue::Set(self.kind.as_str().to_string()),
            sent_date: ActiveValue::Set(now),
            is_sent: ActiveValue::Set(false),
            is_deleted: ActiveValue::Set(false),
            dedup_key: ActiveValue::Set(Some(self.key.clone())),
        };
        let inserted = message::Entity::insert(row)
            .on_conflict(
                OnConflict::column(message::Column::DedupKey)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(inserted == 1)
    }

    /// Marks the claimed row as delivered; it now counts for the cooldown.
    #[tracing::instrument(skip(self, db), fields(key = %self.key))]
    pub async fn confirm<C: ConnectionTrait>(
        &self,
        db: &C,
        sent_at: OffsetDateTime,
    ) -> Result<(), DbErr> {
        message::Entity::update_many()
            .col_expr(message::Column::IsSent, true.into())
            .col_expr(message::Column::SentDate, sent_at.into())
            .filter(message::Column::DedupKey.eq(self.key.as_str()))
            .exec(db)
            .await?;
        Ok(())
    }

    /// Drops an unconfirmed claim so the alert can be attempted again.
    #[tracing::instrument(skip(self, db), fields(key = %self.key))]
    pub async fn release<C: ConnectionTrait>(&self, db: &C) -> Result<(), DbErr> {
        message::Entity::delete_many()
            .filter(message::Column::DedupKey.eq(self.key.as_str()))
            .filter(message::Column::IsSent.eq(false))
            .exec(db)
            .await?;
        Ok(())
    }
}
