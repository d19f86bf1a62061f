//! Farm staff assignment.

use crate::AppResources;
use crate::error::{EventError, StaffRole};
use crate::staff::{StaffAssignmentInput, StaffChanged, change_staff};
use axum::{Extension, Json, extract::Path};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const FARMS_TAG: &str = "Farms API";

pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(change_inseminator))
        .routes(routes!(change_doctor))
}

#[tracing::instrument(skip(resources, payload))]
#[utoipa::path(
    post,
    path = "/{farm_id}/inseminator",
    tag = FARMS_TAG,
    operation_id = "Change Inseminator",
    summary = "Assign a different inseminator to a farm",
    description = "Texts the outgoing inseminator (if any) and the incoming one.",
    params(("farm_id" = String, Path, description = "Farm identifier")),
    request_body = StaffAssignmentInput,
    responses(
        (status = 200, description = "Inseminator changed", body = StaffChanged),
        (status = 400, description = "Inactive or already assigned", content_type = "application/json"),
        (status = 404, description = "Unknown farm or inseminator", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn change_inseminator(
    Extension(resources): Extension<AppResources>,
    Path(farm_id): Path<String>,
    Json(payload): Json<StaffAssignmentInput>,
) -> Result<Json<StaffChanged>, EventError> {
    change_staff(&resources, &farm_id, StaffRole::Inseminator, payload.staff_id)
        .await
        .map(Json)
}

#[tracing::instrument(skip(resources, payload))]
#[utoipa::path(
    post,
    path = "/{farm_id}/doctor",
    tag = FARMS_TAG,
    operation_id = "Change Doctor",
    summary = "Assign a different doctor to a farm",
    description = "Texts the outgoing doctor (if any), the incoming one and the farmer.",
    params(("farm_id" = String, Path, description = "Farm identifier")),
    request_body = StaffAssignmentInput,
    responses(
        (status = 200, description = "Doctor changed", body = StaffChanged),
        (status = 400, description = "Inactive or already assigned", content_type = "application/json"),
        (status = 404, description = "Unknown farm or doctor", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn change_doctor(
    Extension(resources): Extension<AppResources>,
    Path(farm_id): Path<String>,
    Json(payload): Json<StaffAssignmentInput>,
) -> Result<Json<StaffChanged>, EventError> {
    change_staff(&resources, &farm_id, StaffRole::Doctor, payload.staff_id)
        .await
        .map(Json)
}
