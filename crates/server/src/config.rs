use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Longest cooldown window accepted from configuration.
pub const MAX_COOLDOWN_DAYS: i64 = 365;
/// Longest pause between scheduled passes (30 days).
pub const MAX_INTERVAL_HOURS: u64 = 24 * 30;
/// Longest heat-monitoring threshold accepted from configuration.
pub const MAX_HEAT_THRESHOLD_DAYS: i64 = 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Which SMS gateway implementation the process talks to.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SmsMode {
    /// Deliver through the AfroMessage HTTP API.
    Live,
    /// Log messages locally and report success without any network call.
    #[default]
    Stub,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub mode: SmsMode,
    #[serde(default = "default_sms_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_sender_id")]
    pub sender_id: String,
    #[serde(default = "default_sms_timeout_secs")]
    pub timeout_secs: u64,
}

impl SmsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            mode: SmsMode::default(),
            base_url: default_sms_base_url(),
            api_token: None,
            sender_id: default_sender_id(),
            timeout_secs: default_sms_timeout_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
    /// Run one full pass synchronously before the interval starts.
    #[serde(default = "default_true")]
    pub run_on_start: bool,
}

impl SchedulerConfig {
    /// Pause between passes. Values past [`MAX_INTERVAL_HOURS`] are clamped;
    /// `validate` rejects them before they get here.
    pub fn interval(&self) -> Duration {
        let hours = self.interval_hours.min(MAX_INTERVAL_HOURS);
        Duration::from_secs(hours.checked_mul(3600).unwrap_or(u64::MAX))
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
            run_on_start: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AlertRulesConfig {
    /// Days after the last heat sign before a monitoring reminder goes out.
    #[serde(default = "default_heat_threshold_days")]
    pub heat_threshold_days: i64,
    /// Trailing window in which an alert of the same kind is not repeated.
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: i64,
}

impl Default for AlertRulesConfig {
    fn default() -> Self {
        Self {
            heat_threshold_days: default_heat_threshold_days(),
            cooldown_days: default_cooldown_days(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub alerts: AlertRulesConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sms.mode == SmsMode::Live
            && self
                .sms
                .api_token
                .as_deref()
                .is_none_or(|t| t.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "sms.api_token is required when sms.mode is 'live'".into(),
            ));
        }
        if self.sms.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "sms.timeout_secs must be > 0".into(),
            ));
        }
        if !(1..=MAX_INTERVAL_HOURS).contains(&self.scheduler.interval_hours) {
            return Err(ConfigError::Validation(format!(
                "scheduler.interval_hours must be between 1 and {MAX_INTERVAL_HOURS}"
            )));
        }
        if !(1..=MAX_HEAT_THRESHOLD_DAYS).contains(&self.alerts.heat_threshold_days) {
            return Err(ConfigError::Validation(format!(
                "alerts.heat_threshold_days must be between 1 and {MAX_HEAT_THRESHOLD_DAYS}"
            )));
        }
        if !(1..=MAX_COOLDOWN_DAYS).contains(&self.alerts.cooldown_days) {
            return Err(ConfigError::Validation(format!(
                "alerts.cooldown_days must be between 1 and {MAX_COOLDOWN_DAYS}"
            )));
        }
        Ok(())
    }
}

fn default_sms_base_url() -> String {
    "https://api.afromessage.com/api/send".to_string()
}

fn default_sender_id() -> String {
    "AAU-CVMA".to_string()
}

fn default_sms_timeout_secs() -> u64 {
    10
}

fn default_interval_hours() -> u64 {
    24
}

fn default_true() -> bool {
    true
}

fn default_heat_threshold_days() -> i64 {
    crate::alerts::rules::HEAT_MONITORING_THRESHOLD_DAYS
}

fn default_cooldown_days() -> i64 {
    crate::alerts::rules::ALERT_COOLDOWN_DAYS
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// A `.env` file is read first if present. Any variable matching the key path
/// separated by double underscores (e.g. `SMS__API_TOKEN`) overrides the file
/// value.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let _ = dotenvy::dotenv();
    load_config_from("config.yaml")
}

/// Same as [`load_config`] but reads the given file instead of `config.yaml`.
pub fn load_config_from(path: &str) -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
