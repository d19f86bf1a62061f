//! Sickness reports from farmers and assessments from doctors.
//!
//! A report goes to the farm's assigned doctor; an assessment goes back to
//! the farmer. Both are stored before any SMS is sent.

use crate::AppResources;
use crate::entity::{doctor, medical_assessment, medical_report};
use crate::error::{EventError, StaffRole};
use crate::notifications::{
    AssessmentNotifications, AssessmentSummary, MedicalReportNotifications,
    send_assessment_notifications, send_medical_report_notifications,
};
use crate::reproduction::find_farm_and_cow;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct MedicalReportInput {
    pub farm_id: String,
    pub cow_id: String,
    pub sickness_description: String,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct MedicalReportFiled {
    pub report_id: i32,
    pub farm_id: String,
    pub cow_id: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub reported_date: OffsetDateTime,
    pub notifications_sent: MedicalReportNotifications,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct DoctorAssessmentInput {
    pub farm_id: String,
    pub cow_id: String,
    /// Defaults to the farm's assigned doctor.
    #[serde(default)]
    pub doctor_id: Option<i32>,
    pub is_cow_sick: bool,
    #[serde(default)]
    pub has_lameness: bool,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct AssessmentRecorded {
    pub assessment_id: i32,
    pub farm_id: String,
    pub cow_id: String,
    pub doctor_id: i32,
    pub notifications_sent: AssessmentNotifications,
}

async fn find_doctor<C: ConnectionTrait>(db: &C, id: i32) -> Result<doctor::Model, EventError> {
    doctor::Entity::find_by_id(id)
        .filter(doctor::Column::IsDeleted.eq(false))
        .one(db)
        .await?
        .ok_or(EventError::StaffNotFound {
            role: StaffRole::Doctor,
            id,
        })
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Files a farmer's sickness report, forwards it to the farm's doctor and
/// confirms receipt to the farmer.
#[tracing::instrument(skip(resources, input), fields(farm_id = %input.farm_id, cow_id = %input.cow_id))]
pub async fn file_medical_report(
    resources: &AppResources,
    input: MedicalReportInput,
    now: OffsetDateTime,
) -> Result<MedicalReportFiled, EventError> {
    if input.sickness_description.trim().is_empty() {
        return Err(EventError::InvalidInput(
            "sickness_description must not be empty".into(),
        ));
    }
    let db = resources.db.as_ref();
    let (farm, cow) = find_farm_and_cow(db, &input.farm_id, &input.cow_id).await?;
    let doctor_id = farm
        .doctor_id
        .ok_or_else(|| EventError::NoDoctorAssigned(farm.farm_id.clone()))?;
    let doctor = match find_doctor(db, doctor_id).await {
        Err(EventError::StaffNotFound { .. }) => {
            return Err(EventError::NoDoctorAssigned(farm.farm_id.clone()));
        }
        found => found?,
    };

    let report = medical_report::ActiveModel {
        id: ActiveValue::NotSet,
        farm_id: ActiveValue::Set(farm.farm_id.clone()),
        cow_id: ActiveValue::Set(cow.id),
        sickness_description: ActiveValue::Set(input.sickness_description.trim().to_string()),
        reported_date: ActiveValue::Set(now),
        is_deleted: ActiveValue::Set(false),
    }
    .insert(db)
    .await?;

    tracing::info!(
        name = "medical.report.filed",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        farm_id = %farm.farm_id,
        cow_id = %cow.cow_id,
        report_id = report.id,
        doctor_id = doctor.id,
        message = "Medical report filed"
    );

    let notifications_sent = send_medical_report_notifications(
        resources,
        &farm,
        &cow,
        &doctor,
        &report.sickness_description,
    )
    .await?;

    Ok(MedicalReportFiled {
        report_id: report.id,
        farm_id: farm.farm_id,
        cow_id: cow.cow_id,
        reported_date: report.reported_date,
        notifications_sent,
    })
}

/// Stores a doctor's assessment of a cow, sends the result to the farmer and
/// a receipt to the doctor.
#[tracing::instrument(skip(resources, input), fields(farm_id = %input.farm_id, cow_id = %input.cow_id))]
pub async fn record_assessment(
    resources: &AppResources,
    input: DoctorAssessmentInput,
    now: OffsetDateTime,
) -> Result<AssessmentRecorded, EventError> {
    let db = resources.db.as_ref();
    let (farm, cow) = find_farm_and_cow(db, &input.farm_id, &input.cow_id).await?;
    let doctor_id = input
        .doctor_id
        .or(farm.doctor_id)
        .ok_or_else(|| EventError::NoDoctorAssigned(farm.farm_id.clone()))?;
    let doctor = find_doctor(db, doctor_id).await?;

    let notes = blank_to_none(input.notes);
    let assessment = medical_assessment::ActiveModel {
        id: ActiveValue::NotSet,
        farm_id: ActiveValue::Set(farm.farm_id.clone()),
        cow_id: ActiveValue::Set(cow.id),
        doctor_id: ActiveValue::Set(doctor.id),
        assessment_date: ActiveValue::Set(now),
        is_cow_sick: ActiveValue::Set(input.is_cow_sick),
        has_lameness: ActiveValue::Set(input.has_lameness),
        diagnosis: ActiveValue::Set(blank_to_none(input.diagnosis)),
        treatment: ActiveValue::Set(blank_to_none(input.treatment)),
        notes: ActiveValue::Set(notes.clone()),
        is_deleted: ActiveValue::Set(false),
    }
    .insert(db)
    .await?;

    tracing::info!(
        name = "medical.assessment.recorded",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        farm_id = %farm.farm_id,
        cow_id = %cow.cow_id,
        assessment_id = assessment.id,
        is_cow_sick = input.is_cow_sick,
        message = "Medical assessment recorded"
    );

    let notifications_sent = send_assessment_notifications(
        resources,
        &farm,
        &cow,
        &doctor,
        AssessmentSummary {
            is_sick: input.is_cow_sick,
            has_lameness: input.has_lameness,
            notes: notes.as_deref(),
        },
    )
    .await?;

    Ok(AssessmentRecorded {
        assessment_id: assessment.id,
        farm_id: farm.farm_id,
        cow_id: cow.cow_id,
        doctor_id: doctor.id,
        notifications_sent,
    })
}
