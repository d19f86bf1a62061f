//! Gateway used in development and tests when no SMS account is configured.

use crate::sms::{DispatchOutcome, SmsGateway};

#[derive(Debug, Default)]
pub struct StubGateway;

impl StubGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SmsGateway for StubGateway {
    #[tracing::instrument(skip(self, message))]
    async fn send(&self, phone_number: &str, message: &str) -> DispatchOutcome {
        tracing::info!(
            name = "sms.stub.send",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            phone_number = %phone_number,
            body = %message,
            message = "Stub gateway: SMS not sent"
        );
        DispatchOutcome::Success {
            response: "stub gateway: no SMS sent".to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
