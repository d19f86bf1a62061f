//! Scheduled reproduction alerts.
//!
//! ## Submodules
//!
//! - `rules` - heat threshold and calving band arithmetic
//! - `fence` - per-cow, per-kind dedup window and same-day claims
//! - `checks` - the two rule families and the combined daily pass
//! - `scheduler` - interval loop and its stop handle

pub mod checks;
pub mod fence;
pub mod rules;
pub mod scheduler;

pub use checks::{
    CheckSummary, DailyCheckSummary, check_heat_sign_alerts, check_pregnancy_alerts,
    run_daily_checks,
};
pub use rules::{ALERT_COOLDOWN_DAYS, CalvingBand, HEAT_MONITORING_THRESHOLD_DAYS};
pub use scheduler::{AlertScheduler, SchedulerHandle};
