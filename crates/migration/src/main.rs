use config::{Config, Environment, File};
use sea_orm_migration::prelude::*;
use std::env;

/// Reads `database_url` the way the server does: `config.yaml` with
/// environment overrides. Only used when `DATABASE_URL` is not already set.
fn database_url_from_config() -> Option<String> {
    let settings = Config::builder()
        .add_source(File::with_name("config.yaml").required(false))
        .add_source(Environment::default().separator("__"))
        .build()
        .ok()?;
    settings.get_string("database_url").ok()
}

#[tokio::main]
async fn main() {
    if env::var("DATABASE_URL").is_err() {
        match database_url_from_config() {
            Some(url) => env::set_var("DATABASE_URL", url),
            None => {
                eprintln!("DATABASE_URL is not set and config.yaml has no database_url");
                std::process::exit(1);
            }
        }
    }
    cli::run_cli(migration::Migrator).await;
}
