//! Manual trigger for the scheduled alert pass.

use crate::AppResources;
use crate::alerts::{DailyCheckSummary, run_daily_checks};
use axum::{Extension, Json};
use time::OffsetDateTime;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const ALERTS_TAG: &str = "Alerts API";

pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(run_alerts))
}

#[tracing::instrument(skip(resources))]
#[utoipa::path(
    post,
    path = "/run",
    tag = ALERTS_TAG,
    operation_id = "Run Alert Checks",
    summary = "Run the daily alert checks now",
    description = "Evaluates heat-sign and calving rules for every reproduction record and sends any due SMS alerts.\n\n\
                   Alerts already sent within the cooldown window, or already claimed today by the scheduler, are skipped.",
    responses(
        (status = 200, description = "Per-rule counters for the pass", body = DailyCheckSummary)
    )
)]
async fn run_alerts(Extension(resources): Extension<AppResources>) -> Json<DailyCheckSummary> {
    Json(run_daily_checks(&resources, OffsetDateTime::now_utc()).await)
}
