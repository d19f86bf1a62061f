//! Event-driven SMS notifications and their `message` audit rows.
//!
//! Unlike the scheduled alerts, every attempt here is recorded, with
//! `is_sent` reflecting whether the gateway accepted it.

use crate::AppResources;
use crate::entity::message::{self, MessageType};
use crate::entity::{cow, doctor, farm, inseminator};
use crate::error::StaffRole;
use crate::reproduction::CalfSex;
use crate::sms_templates::{
    BirthEvent, DoctorAssessmentConfirmation, DoctorChangeFarmerNotice, DoctorMedicalReportAlert,
    FarmerHeatNotification, FarmerMedicalReportConfirmation, InseminationAlert,
    MedicalAssessmentComplete, PregnancyConfirmation, SmsTemplate, StaffAssignmentNotice,
    StaffUnassignmentNotice,
};
use crate::staff::StaffContact;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait};
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

/// Sends one SMS and records it. Returns whether the gateway accepted it.
#[tracing::instrument(skip(resources, message_text))]
pub async fn send_with_record(
    resources: &AppResources,
    phone_number: &str,
    message_text: &str,
    kind: MessageType,
    farm_id: &str,
    cow_pk: Option<i32>,
) -> Result<bool, DbErr> {
    let outcome = resources.gateway.send(phone_number, message_text).await;
    let is_sent = outcome.is_success();
    if is_sent {
        tracing::info!(
            name = "notifications.sent",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            farm_id = %farm_id,
            kind = kind.as_str(),
            message = "Notification sent"
        );
    } else {
        tracing::warn!(
            name = "notifications.failed",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            farm_id = %farm_id,
            kind = kind.as_str(),
            outcome = outcome.kind(),
            diagnostic = %outcome.diagnostic(),
            message = "Notification not delivered"
        );
    }

    record_message(
        resources.db.as_ref(),
        farm_id,
        cow_pk,
        message_text,
        kind,
        is_sent,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(is_sent)
}

async fn record_message<C: ConnectionTrait>(
    db: &C,
    farm_id: &str,
    cow_pk: Option<i32>,
    message_text: &str,
    kind: MessageType,
    is_sent: bool,
    sent_date: OffsetDateTime,
) -> Result<message::Model, DbErr> {
    message::ActiveModel {
        id: ActiveValue::NotSet,
        farm_id: ActiveValue::Set(farm_id.to_string()),
        cow_id: ActiveValue::Set(cow_pk),
        message_text: ActiveValue::Set(message_text.to_string()),
        message_type: ActiveValue::Set(kind.as_str().to_string()),
        sent_date: ActiveValue::Set(sent_date),
        is_sent: ActiveValue::Set(is_sent),
        is_deleted: ActiveValue::Set(false),
        dedup_key: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct HeatSignNotifications {
    pub inseminator_sent: bool,
    pub farmer_sent: bool,
}

/// The farm's assigned inseminator, if one is assigned and active.
async fn active_inseminator<C: ConnectionTrait>(
    db: &C,
    farm: &farm::Model,
) -> Result<Option<inseminator::Model>, DbErr> {
    let Some(inseminator_id) = farm.inseminator_id else {
        return Ok(None);
    };
    let found = inseminator::Entity::find_by_id(inseminator_id).one(db).await?;
    Ok(found.filter(|i| i.is_active && !i.is_deleted))
}

/// Asks the farm's inseminator to visit and tells the farmer who is coming.
///
/// Nothing is sent when the farm has no active inseminator, since the farmer
/// message names one.
#[tracing::instrument(skip(resources, farm, cow), fields(farm_id = %farm.farm_id, cow_id = %cow.cow_id))]
pub async fn send_heat_sign_notifications(
    resources: &AppResources,
    farm: &farm::Model,
    cow: &cow::Model,
    heat_signs: &str,
) -> Result<HeatSignNotifications, DbErr> {
    let mut results = HeatSignNotifications::default();
    let Some(inseminator) = active_inseminator(resources.db.as_ref(), farm).await? else {
        tracing::warn!(
            name = "notifications.heat.no_inseminator",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            farm_id = %farm.farm_id,
            cow_id = %cow.cow_id,
            message = "Farm has no active inseminator, heat-sign notifications skipped"
        );
        return Ok(results);
    };

    let inseminator_text = InseminationAlert {
        farm_id: &farm.farm_id,
        owner_name: &farm.owner_name,
        address: &farm.address,
        phone: &farm.telephone_number,
        cow_id: &cow.cow_id,
        heat_signs,
    }
    .render();
    results.inseminator_sent = send_with_record(
        resources,
        &inseminator.phone_number,
        &inseminator_text,
        MessageType::InseminationAlert,
        &farm.farm_id,
        Some(cow.id),
    )
    .await?;

    let farmer_text = FarmerHeatNotification {
        cow_id: &cow.cow_id,
        inseminator_name: &inseminator.name,
    }
    .render();
    results.farmer_sent = send_with_record(
        resources,
        &farm.telephone_number,
        &farmer_text,
        MessageType::InseminationAlert,
        &farm.farm_id,
        Some(cow.id),
    )
    .await?;

    Ok(results)
}

#[tracing::instrument(skip(resources, farm, cow), fields(farm_id = %farm.farm_id, cow_id = %cow.cow_id))]
pub async fn send_pregnancy_confirmation(
    resources: &AppResources,
    farm: &farm::Model,
    cow: &cow::Model,
    pregnancy_date: Date,
    expected_calving_date: Date,
) -> Result<bool, DbErr> {
    let text = PregnancyConfirmation {
        cow_id: &cow.cow_id,
        pregnancy_date,
        expected_calving_date,
        lactation_number: cow.reported_lactation(),
    }
    .render();
    send_with_record(
        resources,
        &farm.telephone_number,
        &text,
        MessageType::PregnancyUpdate,
        &farm.farm_id,
        Some(cow.id),
    )
    .await
}

#[tracing::instrument(skip(resources, farm, cow), fields(farm_id = %farm.farm_id, cow_id = %cow.cow_id))]
pub async fn send_birth_notification(
    resources: &AppResources,
    farm: &farm::Model,
    cow: &cow::Model,
    calving_date: Date,
    last_calving_date: Date,
    calf_sex: CalfSex,
) -> Result<bool, DbErr> {
    let text = BirthEvent {
        cow_id: &cow.cow_id,
        calving_date,
        last_calving_date,
        calf_sex,
    }
    .render();
    send_with_record(
        resources,
        &farm.telephone_number,
        &text,
        MessageType::BirthAlert,
        &farm.farm_id,
        Some(cow.id),
    )
    .await
}

/// Delivery results for the two texts a sickness report triggers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct MedicalReportNotifications {
    pub doctor_sent: bool,
    pub farmer_sent: bool,
}

/// Forwards a farmer's sickness report to the doctor and confirms receipt to
/// the farmer.
#[tracing::instrument(skip(resources, farm, cow, doctor, sickness_description), fields(farm_id = %farm.farm_id, cow_id = %cow.cow_id))]
pub async fn send_medical_report_notifications(
    resources: &AppResources,
    farm: &farm::Model,
    cow: &cow::Model,
    doctor: &doctor::Model,
    sickness_description: &str,
) -> Result<MedicalReportNotifications, DbErr> {
    let doctor_text = DoctorMedicalReportAlert {
        cow_id: &cow.cow_id,
        farm_id: &farm.farm_id,
        owner_name: &farm.owner_name,
        sickness_description,
    }
    .render();
    let doctor_sent = send_with_record(
        resources,
        &doctor.phone_number,
        &doctor_text,
        MessageType::HealthAlert,
        &farm.farm_id,
        Some(cow.id),
    )
    .await?;

    let farmer_text = FarmerMedicalReportConfirmation {
        cow_id: &cow.cow_id,
        sickness_description,
        doctor_name: &doctor.name,
    }
    .render();
    let farmer_sent = send_with_record(
        resources,
        &farm.telephone_number,
        &farmer_text,
        MessageType::FarmerAlert,
        &farm.farm_id,
        Some(cow.id),
    )
    .await?;

    Ok(MedicalReportNotifications {
        doctor_sent,
        farmer_sent,
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AssessmentNotifications {
    pub farmer_sent: bool,
    pub doctor_sent: bool,
}

/// What the farmer is told about a finished assessment.
#[derive(Clone, Copy, Debug)]
pub struct AssessmentSummary<'a> {
    pub is_sick: bool,
    pub has_lameness: bool,
    pub notes: Option<&'a str>,
}

/// Sends the assessment result to the farmer and a receipt to the doctor.
#[tracing::instrument(skip(resources, farm, cow, doctor, summary), fields(farm_id = %farm.farm_id, cow_id = %cow.cow_id))]
pub async fn send_assessment_notifications(
    resources: &AppResources,
    farm: &farm::Model,
    cow: &cow::Model,
    doctor: &doctor::Model,
    summary: AssessmentSummary<'_>,
) -> Result<AssessmentNotifications, DbErr> {
    let farmer_text = MedicalAssessmentComplete {
        cow_id: &cow.cow_id,
        doctor_name: &doctor.name,
        is_sick: summary.is_sick,
        has_lameness: summary.has_lameness,
        notes: summary.notes,
    }
    .render();
    let farmer_sent = send_with_record(
        resources,
        &farm.telephone_number,
        &farmer_text,
        MessageType::HealthAlert,
        &farm.farm_id,
        Some(cow.id),
    )
    .await?;

    let doctor_text = DoctorAssessmentConfirmation {
        farm_id: &farm.farm_id,
        owner_name: &farm.owner_name,
        cow_id: &cow.cow_id,
        is_sick: summary.is_sick,
    }
    .render();
    let doctor_sent = send_with_record(
        resources,
        &doctor.phone_number,
        &doctor_text,
        MessageType::DoctorConfirmation,
        &farm.farm_id,
        Some(cow.id),
    )
    .await?;

    Ok(AssessmentNotifications {
        farmer_sent,
        doctor_sent,
    })
}

/// Delivery results for a staff change. `None` means that text was not due.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StaffChangeNotifications {
    pub old_staff_sent: Option<bool>,
    pub new_staff_sent: bool,
    pub farmer_sent: Option<bool>,
}

/// Tells the outgoing staff member they were unassigned, the incoming one
/// where the farm is, and, for a doctor change, the farmer who to call.
#[tracing::instrument(skip(resources, farm, old_staff, new_staff), fields(farm_id = %farm.farm_id, %role))]
pub async fn send_staff_change_notifications(
    resources: &AppResources,
    farm: &farm::Model,
    role: StaffRole,
    old_staff: Option<&StaffContact>,
    new_staff: &StaffContact,
) -> Result<StaffChangeNotifications, DbErr> {
    let kind = match role {
        StaffRole::Inseminator => MessageType::InseminatorAssignment,
        StaffRole::Doctor => MessageType::DoctorAssignment,
    };
    let mut results = StaffChangeNotifications::default();

    if let Some(old) = old_staff {
        let text = StaffUnassignmentNotice {
            farm_id: &farm.farm_id,
            owner_name: &farm.owner_name,
        }
        .render();
        let sent = send_with_record(
            resources,
            &old.phone_number,
            &text,
            kind,
            &farm.farm_id,
            None,
        )
        .await?;
        results.old_staff_sent = Some(sent);
    }

    let text = StaffAssignmentNotice {
        farm_id: &farm.farm_id,
        owner_name: &farm.owner_name,
        address: &farm.address,
        phone: &farm.telephone_number,
    }
    .render();
    results.new_staff_sent = send_with_record(
        resources,
        &new_staff.phone_number,
        &text,
        kind,
        &farm.farm_id,
        None,
    )
    .await?;

    if role == StaffRole::Doctor {
        let text = DoctorChangeFarmerNotice {
            doctor_name: &new_staff.name,
            doctor_phone: &new_staff.phone_number,
        }
        .render();
        let sent = send_with_record(
            resources,
            &farm.telephone_number,
            &text,
            kind,
            &farm.farm_id,
            None,
        )
        .await?;
        results.farmer_sent = Some(sent);
    }

    Ok(results)
}
