//! Field event endpoints: heat signs, pregnancy confirmations and births.

use crate::AppResources;
use crate::error::EventError;
use crate::reproduction::{
    BirthInput, BirthRecorded, HeatSignInput, HeatSignRecorded, PregnancyConfirmed,
    PregnancyInput, confirm_pregnancy, record_birth, record_heat_sign,
};
use axum::{Extension, Json};
use time::OffsetDateTime;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const REPRODUCTION_TAG: &str = "Reproduction API";

pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(post_heat_sign))
        .routes(routes!(post_pregnancy))
        .routes(routes!(post_birth))
}

#[tracing::instrument(skip(resources, payload), fields(farm_id = %payload.farm_id, cow_id = %payload.cow_id))]
#[utoipa::path(
    post,
    path = "/heat-sign",
    tag = REPRODUCTION_TAG,
    operation_id = "Record Heat Sign",
    summary = "Record a heat sign for a cow",
    description = "Creates or updates the cow's reproduction record, then texts the farm's inseminator \
                   and the farmer. Nothing is sent if the farm has no active inseminator.",
    request_body = HeatSignInput,
    responses(
        (status = 200, description = "Heat sign recorded", body = HeatSignRecorded),
        (status = 400, description = "Invalid input", content_type = "application/json"),
        (status = 404, description = "Unknown farm or cow", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn post_heat_sign(
    Extension(resources): Extension<AppResources>,
    Json(payload): Json<HeatSignInput>,
) -> Result<Json<HeatSignRecorded>, EventError> {
    record_heat_sign(&resources, payload, OffsetDateTime::now_utc())
        .await
        .map(Json)
}

#[tracing::instrument(skip(resources, payload), fields(farm_id = %payload.farm_id, cow_id = %payload.cow_id))]
#[utoipa::path(
    post,
    path = "/pregnancy",
    tag = REPRODUCTION_TAG,
    operation_id = "Confirm Pregnancy",
    summary = "Confirm a cow's pregnancy",
    description = "Marks the cow pregnant, stores the expected calving date (`pregnancy_date` plus \
                   `days_until_calving`, unless `expected_calving_date` is given) and texts the \
                   farmer a confirmation.",
    request_body = PregnancyInput,
    responses(
        (status = 200, description = "Pregnancy confirmed", body = PregnancyConfirmed),
        (status = 400, description = "Invalid input", content_type = "application/json"),
        (status = 404, description = "Unknown farm or cow", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn post_pregnancy(
    Extension(resources): Extension<AppResources>,
    Json(payload): Json<PregnancyInput>,
) -> Result<Json<PregnancyConfirmed>, EventError> {
    confirm_pregnancy(&resources, payload).await.map(Json)
}

#[tracing::instrument(skip(resources, payload), fields(farm_id = %payload.farm_id, cow_id = %payload.cow_id))]
#[utoipa::path(
    post,
    path = "/birth",
    tag = REPRODUCTION_TAG,
    operation_id = "Record Birth",
    summary = "Record a calving",
    description = "Ends the cow's pregnancy, increments its lactation number and texts the farmer.",
    request_body = BirthInput,
    responses(
        (status = 200, description = "Birth recorded", body = BirthRecorded),
        (status = 400, description = "Invalid input", content_type = "application/json"),
        (status = 404, description = "Unknown farm or cow", content_type = "application/json"),
        (status = 500, description = "Database error", content_type = "application/json")
    )
)]
async fn post_birth(
    Extension(resources): Extension<AppResources>,
    Json(payload): Json<BirthInput>,
) -> Result<Json<BirthRecorded>, EventError> {
    record_birth(&resources, payload).await.map(Json)
}
