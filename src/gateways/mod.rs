use anyhow::Result;
use rust_decimal::Decimal;

use crate::config::Mode;
use crate::domain::request::PaymentRequest;
use crate::domain::response::PaymentResponse;
use crate::domain::webhook::WebhookPayload;

pub mod mock;

// Business failures (declined card, expired session) come back as Ok
// responses with success == false; errors are reserved for faults that
// prevent producing any response at all.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + std::fmt::Debug {
    // stable lowercase identifier
    fn name(&self) -> &str;

    fn mode(&self) -> Mode;

    fn is_sandbox(&self) -> bool {
        self.mode() == Mode::Sandbox
    }

    fn is_live(&self) -> bool {
        self.mode() == Mode::Live
    }

    fn supports_refund(&self) -> bool {
        false
    }

    async fn pay(&self, request: &PaymentRequest) -> Result<PaymentResponse>;

    // must validate authenticity before trusting the payload
    async fn verify(&self, payload: &WebhookPayload) -> Result<PaymentResponse>;

    async fn refund(&self, _transaction_id: &str, _amount: Decimal) -> Result<bool> {
        anyhow::bail!("gateway '{}' does not support refunds", self.name())
    }
}
