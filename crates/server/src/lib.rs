//! Reproduction tracking and SMS alerting for dairy farms.
//!
//! Field events (heat signs, pregnancy confirmations, births, sickness
//! reports, staff changes) are stored per cow or farm and relayed by SMS. A
//! daily pass reminds farmers when a cow is due for heat monitoring or
//! approaching calving.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::sms::SmsGateway;

pub mod alerts;
pub mod api;
pub mod config;
pub mod entity;
pub mod error;
pub mod medical;
pub mod notifications;
pub mod reproduction;
pub mod sms;
pub mod sms_templates;
pub mod staff;
pub mod validation;

#[derive(Clone, Debug)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub gateway: Arc<dyn SmsGateway>,
    pub config: Arc<AppConfig>,
}
