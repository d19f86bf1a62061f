//! HTTP API.
//!
//! - `health` - Health check endpoint (/healthz)
//! - `alerts` - Manual alert run (/api/alerts/*)
//! - `farms` - Inseminator and doctor assignment (/api/farms/*)
//! - `medical` - Sickness reports and assessments (/api/medical/*)
//! - `messages` - SMS audit log (/api/messages)
//! - `reproduction` - Heat sign, pregnancy and birth events (/api/reproduction/*)
//! - `openapi` - OpenAPI/Utoipa configuration

pub mod alerts;
pub mod farms;
pub mod health;
pub mod medical;
pub mod messages;
pub mod openapi;
pub mod reproduction;

pub use alerts::ALERTS_TAG;
pub use farms::FARMS_TAG;
pub use health::MISC_TAG;
pub use medical::MEDICAL_TAG;
pub use messages::MESSAGES_TAG;
pub use reproduction::REPRODUCTION_TAG;

use crate::AppResources;
use crate::error::EventError;
use axum::{
    Json, Router,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::future::Future;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            EventError::Database(e) => {
                tracing::error!(
                    name = "api.event.database_error",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    error = %e,
                    message = "Database error while handling field event"
                );
                json!({ "error": "Internal database error" })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the full application router, including the Redoc page at `/api-docs`.
pub fn build_router(app_resources: AppResources) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .nest("/api/alerts", alerts::router())
        .nest("/api/farms", farms::router())
        .nest("/api/medical", medical::router())
        .nest("/api/messages", messages::router())
        .nest("/api/reproduction", reproduction::router())
        .routes(routes!(health::health))
        .layer(axum::Extension(app_resources))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    router.merge(Redoc::with_url("/api-docs", api))
}

/// Serves the API on `bind_address` until `shutdown` resolves.
#[tracing::instrument(skip(app_resources, shutdown))]
pub async fn start_webserver<F>(app_resources: AppResources, shutdown: F) -> color_eyre::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = app_resources.config.bind_address.clone();
    let router = build_router(app_resources);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(
        name = "api.server.listening",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        addr = %bind_address,
        message = "Server running"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
