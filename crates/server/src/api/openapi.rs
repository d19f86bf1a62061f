//! OpenAPI/Utoipa configuration.

use crate::api::{
    alerts::ALERTS_TAG, farms::FARMS_TAG, health::MISC_TAG, medical::MEDICAL_TAG,
    messages::MESSAGES_TAG, reproduction::REPRODUCTION_TAG,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Farm Manager API",
        version = "1.0.0",
        description = "Reproduction, health and staff events with SMS alerts for dairy farms."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = ALERTS_TAG, description = "Scheduled alert endpoints"),
        (name = FARMS_TAG, description = "Farm staff assignment"),
        (name = MEDICAL_TAG, description = "Sickness reports and doctor assessments"),
        (name = MESSAGES_TAG, description = "SMS audit log"),
        (name = REPRODUCTION_TAG, description = "Heat sign, pregnancy and birth events")
    )
)]
pub struct ApiDoc;
