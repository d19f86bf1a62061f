//! Heat-sign, pregnancy and birth events reported from the field.
//!
//! Each operation updates the cow's reproduction record and then notifies by
//! SMS. Notifications go out after the database work is committed, so a
//! gateway failure never rolls back the recorded event.

use crate::AppResources;
use crate::entity::{cow, farm, reproduction};
use crate::error::EventError;
use crate::notifications::{
    HeatSignNotifications, send_birth_notification, send_heat_sign_notifications,
    send_pregnancy_confirmation,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};
use utoipa::ToSchema;

/// Upper bound for `days_until_calving`; bovine gestation is about 283 days.
pub const MAX_DAYS_UNTIL_CALVING: i64 = 300;

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct HeatSignInput {
    pub farm_id: String,
    /// Farm-local cow tag.
    pub cow_id: String,
    pub heat_signs: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub heat_start_time: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub heat_sign_recorded_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct HeatSignRecorded {
    pub cow_id: String,
    pub farm_id: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub heat_sign_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub heat_sign_recorded_at: Option<OffsetDateTime>,
    pub notifications_sent: HeatSignNotifications,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct PregnancyInput {
    pub farm_id: String,
    pub cow_id: String,
    #[schema(value_type = String, format = Date)]
    pub pregnancy_date: Date,
    /// Days from `pregnancy_date` to the expected calving.
    pub days_until_calving: i64,
    /// Overrides the date derived from `days_until_calving`.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_calving_date: Option<Date>,
    pub lactation_number: i32,
    pub service_per_conception: i32,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PregnancyConfirmed {
    pub cow_id: String,
    pub farm_id: String,
    #[schema(value_type = String, format = Date)]
    pub pregnancy_date: Date,
    #[schema(value_type = String, format = Date)]
    pub expected_calving_date: Date,
    pub service_per_conception: i32,
    pub lactation_number: i32,
    pub notification_sent: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CalfSex {
    #[serde(rename = "M", alias = "m", alias = "male", alias = "MALE")]
    Male,
    #[serde(rename = "F", alias = "f", alias = "female", alias = "FEMALE")]
    Female,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct BirthInput {
    pub farm_id: String,
    pub cow_id: String,
    #[schema(value_type = String, format = Date)]
    pub calving_date: Date,
    /// The calving before this one.
    #[schema(value_type = String, format = Date)]
    pub last_calving_date: Date,
    pub calf_sex: CalfSex,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct BirthRecorded {
    pub cow_id: String,
    pub farm_id: String,
    #[schema(value_type = String, format = Date)]
    pub calving_date: Date,
    #[schema(value_type = String, format = Date)]
    pub last_calving_date: Date,
    pub calf_sex: CalfSex,
    /// Lactation number after this calving.
    pub lactation_number: i32,
    pub notification_sent: bool,
}

/// `pregnancy_date` plus the reported days until calving.
pub fn calving_date_from(pregnancy_date: Date, days_until_calving: i64) -> Option<Date> {
    if !(1..=MAX_DAYS_UNTIL_CALVING).contains(&days_until_calving) {
        return None;
    }
    pregnancy_date.checked_add(Duration::days(days_until_calving))
}

fn require_non_empty(value: &str, field: &str) -> Result<(), EventError> {
    if value.trim().is_empty() {
        return Err(EventError::InvalidInput(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

/// Live farm and the live cow carrying `cow_tag` on it.
pub(crate) async fn find_farm_and_cow<C: ConnectionTrait>(
    db: &C,
    farm_id: &str,
    cow_tag: &str,
) -> Result<(farm::Model, cow::Model), EventError> {
    let farm = farm::Entity::find_by_id(farm_id.to_string())
        .filter(farm::Column::IsDeleted.eq(false))
        .one(db)
        .await?
        .ok_or_else(|| EventError::FarmNotFound(farm_id.to_string()))?;
    let cow = cow::Entity::find()
        .filter(cow::Column::FarmId.eq(farm_id))
        .filter(cow::Column::CowId.eq(cow_tag))
        .filter(cow::Column::IsDeleted.eq(false))
        .one(db)
        .await?
        .ok_or_else(|| EventError::CowNotFound {
            farm_id: farm_id.to_string(),
            cow_id: cow_tag.to_string(),
        })?;
    Ok((farm, cow))
}

async fn find_reproduction<C: ConnectionTrait>(
    db: &C,
    cow: &cow::Model,
) -> Result<Option<reproduction::Model>, EventError> {
    Ok(reproduction::Entity::find()
        .filter(reproduction::Column::CowId.eq(cow.id))
        .filter(reproduction::Column::FarmId.eq(cow.farm_id.as_str()))
        .filter(reproduction::Column::IsDeleted.eq(false))
        .one(db)
        .await?)
}

/// Records a heat sign and notifies the farm's inseminator and the farmer.
#[tracing::instrument(skip(resources, input), fields(farm_id = %input.farm_id, cow_id = %input.cow_id))]
pub async fn record_heat_sign(
    resources: &AppResources,
    input: HeatSignInput,
    now: OffsetDateTime,
) -> Result<HeatSignRecorded, EventError> {
    require_non_empty(&input.farm_id, "farm_id")?;
    require_non_empty(&input.cow_id, "cow_id")?;
    require_non_empty(&input.heat_signs, "heat_signs")?;
    if input.heat_start_time > now {
        return Err(EventError::InvalidInput(
            "heat_start_time must not be in the future".into(),
        ));
    }

    let db = resources.db.as_ref();
    let (farm, cow) = find_farm_and_cow(db, &input.farm_id, &input.cow_id).await?;

    let saved = match find_reproduction(db, &cow).await? {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.heat_sign_start = ActiveValue::Set(Some(input.heat_start_time));
            active.heat_signs_seen = ActiveValue::Set(Some(input.heat_signs.clone()));
            if let Some(recorded_at) = input.heat_sign_recorded_at {
                active.heat_sign_recorded_at = ActiveValue::Set(Some(recorded_at));
            }
            active.update(db).await?
        }
        None => {
            reproduction::ActiveModel {
                id: ActiveValue::NotSet,
                farm_id: ActiveValue::Set(farm.farm_id.clone()),
                cow_id: ActiveValue::Set(cow.id),
                heat_sign_start: ActiveValue::Set(Some(input.heat_start_time)),
                heat_signs_seen: ActiveValue::Set(Some(input.heat_signs.clone())),
                heat_sign_recorded_at: ActiveValue::Set(Some(
                    input.heat_sign_recorded_at.unwrap_or(now),
                )),
                is_cow_pregnant: ActiveValue::Set(false),
                pregnancy_date: ActiveValue::Set(None),
                calving_date: ActiveValue::Set(None),
                is_deleted: ActiveValue::Set(false),
            }
            .insert(db)
            .await?
        }
    };

    tracing::info!(
        name = "reproduction.heat_sign.recorded",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        farm_id = %farm.farm_id,
        cow_id = %cow.cow_id,
        record_id = saved.id,
        message = "Heat sign recorded"
    );

    let notifications_sent =
        send_heat_sign_notifications(resources, &farm, &cow, &input.heat_signs).await?;

    Ok(HeatSignRecorded {
        cow_id: cow.cow_id,
        farm_id: farm.farm_id,
        heat_sign_start: input.heat_start_time,
        heat_sign_recorded_at: saved.heat_sign_recorded_at,
        notifications_sent,
    })
}

/// Marks the cow pregnant, updates its lactation and insemination counts and
/// sends the farmer a confirmation with the expected calving date.
#[tracing::instrument(skip(resources, input), fields(farm_id = %input.farm_id, cow_id = %input.cow_id))]
pub async fn confirm_pregnancy(
    resources: &AppResources,
    input: PregnancyInput,
) -> Result<PregnancyConfirmed, EventError> {
    require_non_empty(&input.farm_id, "farm_id")?;
    require_non_empty(&input.cow_id, "cow_id")?;
    if input.lactation_number < 0 || input.service_per_conception < 0 {
        return Err(EventError::InvalidInput(
            "lactation_number and service_per_conception must not be negative".into(),
        ));
    }
    let derived = calving_date_from(input.pregnancy_date, input.days_until_calving)
        .ok_or_else(|| {
            EventError::InvalidInput(format!(
                "days_until_calving must be between 1 and {MAX_DAYS_UNTIL_CALVING}"
            ))
        })?;
    let expected_calving_date = input.expected_calving_date.unwrap_or(derived);
    if expected_calving_date <= input.pregnancy_date {
        return Err(EventError::InvalidInput(
            "expected_calving_date must be after pregnancy_date".into(),
        ));
    }

    let txn = resources.db.begin().await?;
    let (farm, cow) = find_farm_and_cow(&txn, &input.farm_id, &input.cow_id).await?;

    match find_reproduction(&txn, &cow).await? {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.is_cow_pregnant = ActiveValue::Set(true);
            active.pregnancy_date = ActiveValue::Set(Some(input.pregnancy_date));
            active.calving_date = ActiveValue::Set(Some(expected_calving_date));
            active.update(&txn).await?;
        }
        None => {
            reproduction::ActiveModel {
                id: ActiveValue::NotSet,
                farm_id: ActiveValue::Set(farm.farm_id.clone()),
                cow_id: ActiveValue::Set(cow.id),
                heat_sign_start: ActiveValue::Set(None),
                heat_signs_seen: ActiveValue::Set(None),
                heat_sign_recorded_at: ActiveValue::Set(None),
                is_cow_pregnant: ActiveValue::Set(true),
                pregnancy_date: ActiveValue::Set(Some(input.pregnancy_date)),
                calving_date: ActiveValue::Set(Some(expected_calving_date)),
                is_deleted: ActiveValue::Set(false),
            }
            .insert(&txn)
            .await?;
        }
    }

    let mut cow_update = cow.into_active_model();
    cow_update.lactation_number = ActiveValue::Set(input.lactation_number);
    cow_update.number_of_inseminations = ActiveValue::Set(input.service_per_conception);
    let cow = cow_update.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        name = "reproduction.pregnancy.confirmed",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        farm_id = %farm.farm_id,
        cow_id = %cow.cow_id,
        expected_calving_date = %expected_calving_date,
        message = "Pregnancy confirmed"
    );

    let notification_sent = send_pregnancy_confirmation(
        resources,
        &farm,
        &cow,
        input.pregnancy_date,
        expected_calving_date,
    )
    .await?;

    Ok(PregnancyConfirmed {
        cow_id: cow.cow_id,
        farm_id: farm.farm_id,
        pregnancy_date: input.pregnancy_date,
        expected_calving_date,
        service_per_conception: input.service_per_conception,
        lactation_number: input.lactation_number,
        notification_sent,
    })
}

/// Closes the cow's pregnancy, bumps its lactation number and tells the
/// farmer about the calf.
#[tracing::instrument(skip(resources, input), fields(farm_id = %input.farm_id, cow_id = %input.cow_id))]
pub async fn record_birth(
    resources: &AppResources,
    input: BirthInput,
) -> Result<BirthRecorded, EventError> {
    require_non_empty(&input.farm_id, "farm_id")?;
    require_non_empty(&input.cow_id, "cow_id")?;
    if input.last_calving_date > input.calving_date {
        return Err(EventError::InvalidInput(
            "last_calving_date must not be after calving_date".into(),
        ));
    }

    let txn = resources.db.begin().await?;
    let (farm, cow) = find_farm_and_cow(&txn, &input.farm_id, &input.cow_id).await?;

    let pregnancy = reproduction::Entity::find()
        .filter(reproduction::Column::CowId.eq(cow.id))
        .filter(reproduction::Column::IsCowPregnant.eq(true))
        .filter(reproduction::Column::IsDeleted.eq(false))
        .one(&txn)
        .await?;
    if let Some(record) = pregnancy {
        let mut active = record.into_active_model();
        active.is_cow_pregnant = ActiveValue::Set(false);
        active.calving_date = ActiveValue::Set(Some(input.calving_date));
        active.update(&txn).await?;
    }

    let lactation_number = cow.lactation_number + 1;
    let mut cow_update = cow.into_active_model();
    cow_update.lactation_number = ActiveValue::Set(lactation_number);
    cow_update.last_calving_date = ActiveValue::Set(Some(input.calving_date));
    let cow = cow_update.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        name = "reproduction.birth.recorded",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        farm_id = %farm.farm_id,
        cow_id = %cow.cow_id,
        calving_date = %input.calving_date,
        lactation_number,
        message = "Birth recorded"
    );

    let notification_sent = send_birth_notification(
        resources,
        &farm,
        &cow,
        input.calving_date,
        input.last_calving_date,
        input.calf_sex,
    )
    .await?;

    Ok(BirthRecorded {
        cow_id: cow.cow_id,
        farm_id: farm.farm_id,
        calving_date: input.calving_date,
        last_calving_date: input.last_calving_date,
        calf_sex: input.calf_sex,
        lactation_number,
        notification_sent,
    })
}
