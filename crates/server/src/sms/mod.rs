//! Outbound SMS delivery.
//!
//! - `afromessage` - HTTP client for the AfroMessage gateway
//! - `stub` - local stand-in used when no live gateway is configured
//!
//! Every send is normalized into a [`DispatchOutcome`]. Nothing here retries;
//! a failed scheduled alert becomes eligible again on the next pass.

pub mod afromessage;
pub mod stub;

pub use afromessage::AfroMessageGateway;
pub use stub::StubGateway;

use crate::config::{ConfigError, SmsConfig, SmsMode};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Result of a single send, classified the same way for every gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The gateway acknowledged the message.
    Success { response: String },
    /// The gateway answered but declined the request.
    ApiError { response: String },
    /// The gateway answered with a non-2xx status.
    HttpError { status: u16, body: String },
    /// The request never got an answer (DNS, connect, reset, timeout).
    NetworkError { message: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success { .. })
    }

    /// Short classification label, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchOutcome::Success { .. } => "success",
            DispatchOutcome::ApiError { .. } => "api_error",
            DispatchOutcome::HttpError { .. } => "http_error",
            DispatchOutcome::NetworkError { .. } => "network_error",
        }
    }

    /// Gateway response body or transport error text.
    pub fn diagnostic(&self) -> &str {
        match self {
            DispatchOutcome::Success { response } | DispatchOutcome::ApiError { response } => {
                response
            }
            DispatchOutcome::HttpError { body, .. } => body,
            DispatchOutcome::NetworkError { message } => message,
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::HttpError { status, body } => write!(f, "http_error ({status}): {body}"),
            other => write!(f, "{}: {}", other.kind(), other.diagnostic()),
        }
    }
}

/// A channel that can deliver one text message to one phone number.
#[async_trait::async_trait]
pub trait SmsGateway: Send + Sync + fmt::Debug {
    async fn send(&self, phone_number: &str, message: &str) -> DispatchOutcome;

    /// Human-readable name for logs (e.g. "afromessage", "stub").
    fn name(&self) -> &'static str;
}

/// Builds the gateway selected by `sms.mode`.
pub fn gateway_from_config(config: &SmsConfig) -> Result<Arc<dyn SmsGateway>, ConfigError> {
    match config.mode {
        SmsMode::Stub => {
            tracing::warn!(
                name = "sms.gateway.stub",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                message = "SMS gateway in stub mode; messages are logged, not sent"
            );
            Ok(Arc::new(StubGateway::new()))
        }
        SmsMode::Live => {
            let token = config
                .api_token
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    ConfigError::Validation(
                        "sms.api_token is required when sms.mode is 'live'".into(),
                    )
                })?;
            let gateway = AfroMessageGateway::new(
                &config.base_url,
                token,
                &config.sender_id,
                config.timeout(),
            )
            .map_err(|e| ConfigError::Validation(format!("failed to build SMS client: {e}")))?;
            Ok(Arc::new(gateway))
        }
    }
}
