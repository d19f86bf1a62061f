//! Daily alert passes over reproduction records.
//!
//! Two rule families run in each pass: heat-sign monitoring for cows that are
//! not pregnant, and calving countdown reminders for pregnant cows. Records
//! are handled one at a time; a failure on one record is logged and counted
//! without stopping the rest of the pass.

use crate::AppResources;
use crate::alerts::fence::{AlertClaim, recently_alerted};
use crate::alerts::rules::{CalvingBand, days_since_heat, days_until_calving, heat_reminder_due};
use crate::entity::message::MessageType;
use crate::entity::{cow, farm, reproduction};
use crate::error::AlertError;
use crate::sms::DispatchOutcome;
use crate::sms_templates::{CalvingReminder, HeatMonitoringReminder, SmsTemplate};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use time::{Date, OffsetDateTime, UtcOffset};
use utoipa::ToSchema;

/// Counters for one rule family in one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CheckSummary {
    /// Records considered by the rule family.
    pub scanned: u32,
    /// Alerts delivered and logged.
    pub sent: u32,
    /// Records outside every window, fenced, or already claimed today.
    pub skipped: u32,
    /// Dispatch failures and per-record errors.
    pub failed: u32,
}

impl CheckSummary {
    fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Sent => self.sent += 1,
            RecordOutcome::Skipped(_) => self.skipped += 1,
            RecordOutcome::DispatchFailed(_) => self.failed += 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DailyCheckSummary {
    pub heat: CheckSummary,
    pub pregnancy: CheckSummary,
}

impl DailyCheckSummary {
    pub fn total_sent(&self) -> u32 {
        self.heat.sent + self.pregnancy.sent
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SkipReason {
    OutsideWindow,
    RecentlyAlerted,
    AlreadyClaimed,
    Deleted,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            SkipReason::OutsideWindow => "outside_window",
            SkipReason::RecentlyAlerted => "recently_alerted",
            SkipReason::AlreadyClaimed => "already_claimed",
            SkipReason::Deleted => "deleted",
        }
    }
}

#[derive(Debug)]
enum RecordOutcome {
    Sent,
    Skipped(SkipReason),
    DispatchFailed(DispatchOutcome),
}

fn utc_date(now: OffsetDateTime) -> Date {
    now.to_offset(UtcOffset::UTC).date()
}

/// Loads the cow and farm a record points at.
///
/// Returns `None` when either one is soft-deleted.
async fn load_owner(
    resources: &AppResources,
    record: &reproduction::Model,
) -> Result<Option<(cow::Model, farm::Model)>, AlertError> {
    let db = resources.db.as_ref();
    let cow = cow::Entity::find_by_id(record.cow_id)
        .one(db)
        .await?
        .ok_or(AlertError::MissingCow(record.cow_id))?;
    let farm = farm::Entity::find_by_id(record.farm_id.clone())
        .one(db)
        .await?
        .ok_or_else(|| AlertError::MissingFarm(record.farm_id.clone()))?;
    if cow.is_deleted || farm.is_deleted {
        return Ok(None);
    }
    Ok(Some((cow, farm)))
}

/// Claims, sends and confirms one alert.
async fn deliver(
    resources: &AppResources,
    claim: AlertClaim,
    phone_number: &str,
    now: OffsetDateTime,
) -> Result<RecordOutcome, AlertError> {
    let db = resources.db.as_ref();
    if !claim.acquire(db, now).await? {
        return Ok(RecordOutcome::Skipped(SkipReason::AlreadyClaimed));
    }

    let outcome = resources.gateway.send(phone_number, &claim.message_text).await;
    if outcome.is_success() {
        // The SMS is out; a pending claim still fences the alert, so a failed
        // confirm must not turn into a resend.
        if let Err(e) = claim.confirm(db, now).await {
            tracing::error!(
                name = "alerts.confirm_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                key = %claim.key,
                error = %e,
                message = "Alert delivered but its claim could not be confirmed"
            );
        }
        Ok(RecordOutcome::Sent)
    } else {
        claim.release(db).await?;
        Ok(RecordOutcome::DispatchFailed(outcome))
    }
}

async fn evaluate_heat_record(
    resources: &AppResources,
    record: &reproduction::Model,
    heat_sign_start: OffsetDateTime,
    days: i64,
    now: OffsetDateTime,
) -> Result<RecordOutcome, AlertError> {
    let rules = &resources.config.alerts;
    let today = utc_date(now);
    let kind = MessageType::HeatMonitoringAlert;

    if !heat_reminder_due(days, rules.heat_threshold_days) {
        return Ok(RecordOutcome::Skipped(SkipReason::OutsideWindow));
    }
    if recently_alerted(
        resources.db.as_ref(),
        &record.farm_id,
        record.cow_id,
        kind,
        today,
        rules.cooldown_days,
    )
    .await?
    {
        return Ok(RecordOutcome::Skipped(SkipReason::RecentlyAlerted));
    }
    let Some((cow, farm)) = load_owner(resources, record).await? else {
        return Ok(RecordOutcome::Skipped(SkipReason::Deleted));
    };

    let text = HeatMonitoringReminder {
        cow_id: &cow.cow_id,
        days_since_heat: days,
        last_heat_date: utc_date(heat_sign_start),
    }
    .render();
    let claim = AlertClaim::new(&farm.farm_id, cow.id, kind, text, today);
    deliver(resources, claim, &farm.telephone_number, now).await
}

/// Heat-sign monitoring: reminds the farmer once a non-pregnant cow has gone
/// the threshold number of days since its last recorded heat sign.
#[tracing::instrument(skip(resources))]
pub async fn check_heat_sign_alerts(
    resources: &AppResources,
    now: OffsetDateTime,
) -> Result<CheckSummary, DbErr> {
    let records = reproduction::Entity::find()
        .filter(reproduction::Column::IsCowPregnant.eq(false))
        .filter(reproduction::Column::IsDeleted.eq(false))
        .filter(reproduction::Column::HeatSignStart.is_not_null())
        .order_by_asc(reproduction::Column::Id)
        .all(resources.db.as_ref())
        .await?;

    let today = utc_date(now);
    let mut summary = CheckSummary::default();
    for record in &records {
        let Some(heat_sign_start) = record.heat_sign_start else {
            continue;
        };
        summary.scanned += 1;
        let days = days_since_heat(heat_sign_start, today);

        match evaluate_heat_record(resources, record, heat_sign_start, days, now).await {
            Ok(outcome) => {
                log_outcome(record, MessageType::HeatMonitoringAlert, days, &outcome);
                summary.record(&outcome);
            }
            Err(e) => {
                tracing::error!(
                    name = "alerts.heat.record_failed",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    cow_id = record.cow_id,
                    kind = MessageType::HeatMonitoringAlert.as_str(),
                    days = days,
                    error = %e,
                    message = "Failed to evaluate heat-sign record"
                );
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        name = "alerts.heat.completed",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        scanned = summary.scanned,
        sent = summary.sent,
        skipped = summary.skipped,
        failed = summary.failed,
        message = "Heat-sign check completed"
    );
    Ok(summary)
}

async fn evaluate_pregnancy_record(
    resources: &AppResources,
    record: &reproduction::Model,
    calving_date: Date,
    days: i64,
    now: OffsetDateTime,
) -> Result<RecordOutcome, AlertError> {
    let today = utc_date(now);
    let Some(band) = CalvingBand::classify(days) else {
        return Ok(RecordOutcome::Skipped(SkipReason::OutsideWindow));
    };
    let kind = band.message_type();

    if recently_alerted(
        resources.db.as_ref(),
        &record.farm_id,
        record.cow_id,
        kind,
        today,
        resources.config.alerts.cooldown_days,
    )
    .await?
    {
        return Ok(RecordOutcome::Skipped(SkipReason::RecentlyAlerted));
    }
    let Some((cow, farm)) = load_owner(resources, record).await? else {
        return Ok(RecordOutcome::Skipped(SkipReason::Deleted));
    };

    tracing::debug!(
        name = "alerts.pregnancy.band",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        cow_id = %cow.cow_id,
        band = band.description(),
        days = days,
    );
    let text = CalvingReminder {
        milestone: band.milestone(),
        cow_id: &cow.cow_id,
        expected_calving_date: calving_date,
        lactation_number: cow.reported_lactation(),
    }
    .render();
    let claim = AlertClaim::new(&farm.farm_id, cow.id, kind, text, today);
    deliver(resources, claim, &farm.telephone_number, now).await
}

/// Calving countdown: reminds the farmer roughly two months out, one month
/// out and around the expected calving date.
#[tracing::instrument(skip(resources))]
pub async fn check_pregnancy_alerts(
    resources: &AppResources,
    now: OffsetDateTime,
) -> Result<CheckSummary, DbErr> {
    let records = reproduction::Entity::find()
        .filter(reproduction::Column::IsCowPregnant.eq(true))
        .filter(reproduction::Column::IsDeleted.eq(false))
        .filter(reproduction::Column::CalvingDate.is_not_null())
        .order_by_asc(reproduction::Column::Id)
        .all(resources.db.as_ref())
        .await?;

    let today = utc_date(now);
    let mut summary = CheckSummary::default();
    for record in &records {
        let Some(calving_date) = record.calving_date else {
            continue;
        };
        summary.scanned += 1;
        let days = days_until_calving(calving_date, today);
        let kind = CalvingBand::classify(days)
            .map(CalvingBand::message_type)
            .unwrap_or(MessageType::Other);

        match evaluate_pregnancy_record(resources, record, calving_date, days, now).await {
            Ok(outcome) => {
                log_outcome(record, kind, days, &outcome);
                summary.record(&outcome);
            }
            Err(e) => {
                tracing::error!(
                    name = "alerts.pregnancy.record_failed",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    cow_id = record.cow_id,
                    kind = kind.as_str(),
                    days = days,
                    error = %e,
                    message = "Failed to evaluate pregnancy record"
                );
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        name = "alerts.pregnancy.completed",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        scanned = summary.scanned,
        sent = summary.sent,
        skipped = summary.skipped,
        failed = summary.failed,
        message = "Pregnancy check completed"
    );
    Ok(summary)
}

fn log_outcome(record: &reproduction::Model, kind: MessageType, days: i64, outcome: &RecordOutcome) {
    match outcome {
        RecordOutcome::Sent => tracing::info!(
            name = "alerts.sent",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            cow_id = record.cow_id,
            farm_id = %record.farm_id,
            kind = kind.as_str(),
            days = days,
            message = "Alert sent"
        ),
        RecordOutcome::Skipped(reason) => tracing::debug!(
            name = "alerts.skipped",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            cow_id = record.cow_id,
            kind = kind.as_str(),
            days = days,
            reason = reason.as_str(),
        ),
        RecordOutcome::DispatchFailed(dispatch) => tracing::warn!(
            name = "alerts.dispatch_failed",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            cow_id = record.cow_id,
            farm_id = %record.farm_id,
            kind = kind.as_str(),
            days = days,
            outcome = dispatch.kind(),
            diagnostic = %dispatch.diagnostic(),
            message = "Alert dispatch failed, will retry next pass"
        ),
    }
}

/// Runs both rule families. A family whose record query fails is logged and
/// reported as empty; the other family still runs.
#[tracing::instrument(skip(resources))]
pub async fn run_daily_checks(resources: &AppResources, now: OffsetDateTime) -> DailyCheckSummary {
    tracing::info!(
        name = "alerts.daily.started",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        date = %utc_date(now),
        message = "Running daily alert checks"
    );

    let heat = check_heat_sign_alerts(resources, now)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(
                name = "alerts.heat.query_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = %e,
                message = "Could not load heat-sign records"
            );
            CheckSummary::default()
        });
    let pregnancy = check_pregnancy_alerts(resources, now)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(
                name = "alerts.pregnancy.query_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = %e,
                message = "Could not load pregnancy records"
            );
            CheckSummary::default()
        });

    let summary = DailyCheckSummary { heat, pregnancy };
    tracing::info!(
        name = "alerts.daily.completed",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        heat_sent = summary.heat.sent,
        pregnancy_sent = summary.pregnancy.sent,
        total_sent = summary.total_sent(),
        message = "Daily alert checks completed"
    );
    summary
}
