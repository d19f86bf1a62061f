use farm_manager::AppResources;
use farm_manager::alerts::AlertScheduler;
use farm_manager::api::start_webserver;
use farm_manager::config::load_config;
use farm_manager::sms::gateway_from_config;
use sea_orm::Database;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "farm_manager=info,tower_http=info,sea_orm=warn";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let layer = fmt::layer().with_target(true).with_level(true);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    initialize_tracing();

    let config = Arc::new(load_config()?);
    let db = Arc::new(Database::connect(&config.database_url).await?);
    let gateway = gateway_from_config(&config.sms)?;
    tracing::info!(
        gateway = gateway.name(),
        interval_hours = config.scheduler.interval_hours,
        heat_threshold_days = config.alerts.heat_threshold_days,
        cooldown_days = config.alerts.cooldown_days,
        "alerting configuration"
    );

    let resources = AppResources {
        db,
        gateway,
        config,
    };

    let scheduler = AlertScheduler::from_config(resources.clone()).start().await;

    let served = start_webserver(resources, shutdown_signal()).await;
    scheduler.stop().await;
    served
}
