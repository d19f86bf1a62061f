//! Sickness reports and doctor assessments.

use crate::AppResources;
use crate::error::EventError;
use crate::medical::{
    AssessmentRecorded, DoctorAssessmentInput, MedicalReportFiled, MedicalReportInput,
    file_medical_report, record_assessment,
};
use axum::{Extension, Json};
use time::OffsetDateTime;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const MEDICAL_TAG: &str = "Medical API";

pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(post_medical_report))
        .routes(routes!(post_doctor_assessment))
}

#[tracing::instrument(skip(resources, payload), fields(farm_id = %payload.farm_id, cow_id = %payload.cow_id))]
#[utoipa::path(
    post,
    path = "/report",
    tag = MEDICAL_TAG,
    operation_id = "File Medical Report",
    summary = "Report a sick cow to the farm's doctor",
    description = "Stores the report, texts the farm's doctor and confirms receipt to the farmer. \
                   Rejected when the farm has no doctor.",
    request_body = MedicalReportInput,
    responses(
        (status = 200, description = "Report filed", body = MedicalReportFiled),
        (status = 400, description = "Invalid input or no doctor assigned", content_type = "application/json"),
        (status = 404, description = "Unknown farm or cow", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn post_medical_report(
    Extension(resources): Extension<AppResources>,
    Json(payload): Json<MedicalReportInput>,
) -> Result<Json<MedicalReportFiled>, EventError> {
    file_medical_report(&resources, payload, OffsetDateTime::now_utc())
        .await
        .map(Json)
}

#[tracing::instrument(skip(resources, payload), fields(farm_id = %payload.farm_id, cow_id = %payload.cow_id))]
#[utoipa::path(
    post,
    path = "/assessment",
    tag = MEDICAL_TAG,
    operation_id = "Record Doctor Assessment",
    summary = "Record a doctor's assessment of a cow",
    description = "Stores the assessment, texts the result to the farmer and a receipt to the doctor.",
    request_body = DoctorAssessmentInput,
    responses(
        (status = 200, description = "Assessment recorded", body = AssessmentRecorded),
        (status = 400, description = "No doctor given or assigned", content_type = "application/json"),
        (status = 404, description = "Unknown farm, cow or doctor", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn post_doctor_assessment(
    Extension(resources): Extension<AppResources>,
    Json(payload): Json<DoctorAssessmentInput>,
) -> Result<Json<AssessmentRecorded>, EventError> {
    record_assessment(&resources, payload, OffsetDateTime::now_utc())
        .await
        .map(Json)
}
