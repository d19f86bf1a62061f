//! AfroMessage SMS gateway client.
//!
//! `GET {base_url}?sender=..&to=..&message=..&callback=` with a bearer token.
//! A delivered message is answered with `{"acknowledge": "success", ...}`.

use crate::sms::{DispatchOutcome, SmsGateway};
use crate::validation::phone_number::{is_valid_phone_number, normalize_phone_number};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct GatewayAck {
    acknowledge: Option<String>,
}

pub struct AfroMessageGateway {
    base_url: String,
    api_token: String,
    sender_id: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for AfroMessageGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfroMessageGateway")
            .field("base_url", &self.base_url)
            .field("sender_id", &self.sender_id)
            .finish_non_exhaustive()
    }
}

impl AfroMessageGateway {
    /// Every request is bounded by `timeout`; a hang surfaces as a network error.
    pub fn new(
        base_url: &str,
        api_token: &str,
        sender_id: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.to_string(),
            api_token: api_token.to_string(),
            sender_id: sender_id.to_string(),
            client,
        })
    }

    fn classify_body(status: reqwest::StatusCode, body: String) -> DispatchOutcome {
        if !status.is_success() {
            return DispatchOutcome::HttpError {
                status: status.as_u16(),
                body,
            };
        }
        match serde_json::from_str::<GatewayAck>(&body) {
            Ok(ack) if ack.acknowledge.as_deref() == Some("success") => {
                DispatchOutcome::Success { response: body }
            }
            _ => DispatchOutcome::ApiError { response: body },
        }
    }
}

#[async_trait::async_trait]
impl SmsGateway for AfroMessageGateway {
    #[tracing::instrument(skip(self, message), fields(message_len = message.len()))]
    async fn send(&self, phone_number: &str, message: &str) -> DispatchOutcome {
        let recipient = normalize_phone_number(phone_number);
        if !is_valid_phone_number(&recipient) {
            tracing::warn!(
                name = "sms.afromessage.suspicious_recipient",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                recipient = %recipient,
                message = "Recipient does not look like a phone number, sending anyway"
            );
        }

        let response = self
            .client
            .get(&self.base_url)
            .bearer_auth(&self.api_token)
            .query(&[
                ("sender", self.sender_id.as_str()),
                ("to", recipient.as_str()),
                ("message", message),
                ("callback", ""),
            ])
            .send()
            .await;

        let outcome = match response {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(body) => Self::classify_body(status, body),
                    Err(e) => DispatchOutcome::NetworkError {
                        message: format!("failed reading gateway response: {e}"),
                    },
                }
            }
            Err(e) if e.is_timeout() => DispatchOutcome::NetworkError {
                message: format!("timeout: {e}"),
            },
            Err(e) => DispatchOutcome::NetworkError {
                message: e.to_string(),
            },
        };

        if outcome.is_success() {
            tracing::info!(
                name = "sms.afromessage.sent",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                recipient = %recipient,
                message = "SMS sent"
            );
        } else {
            tracing::error!(
                name = "sms.afromessage.failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                recipient = %recipient,
                outcome = outcome.kind(),
                diagnostic = %outcome.diagnostic(),
                message = "SMS delivery failed"
            );
        }
        outcome
    }

    fn name(&self) -> &'static str {
        "afromessage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn acknowledged_body_is_success() {
        let outcome = AfroMessageGateway::classify_body(
            StatusCode::OK,
            r#"{"acknowledge":"success","response":{"message_id":"1"}}"#.into(),
        );
        assert!(outcome.is_success());
    }

    #[test]
    fn rejected_body_is_api_error() {
        let outcome = AfroMessageGateway::classify_body(
            StatusCode::OK,
            r#"{"acknowledge":"error","response":{"errors":["bad sender"]}}"#.into(),
        );
        assert_eq!(outcome.kind(), "api_error");
    }

    #[test]
    fn non_json_success_status_is_api_error() {
        let outcome = AfroMessageGateway::classify_body(StatusCode::OK, "<html>".into());
        assert_eq!(outcome.kind(), "api_error");
    }

    #[test]
    fn non_2xx_is_http_error() {
        let outcome =
            AfroMessageGateway::classify_body(StatusCode::UNAUTHORIZED, "unauthorized".into());
        assert_eq!(
            outcome,
            DispatchOutcome::HttpError {
                status: 401,
                body: "unauthorized".into()
            }
        );
    }
}
