use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::config::{GatewaySettings, Mode};
use crate::domain::request::PaymentRequest;
use crate::domain::response::{PaymentResponse, PaymentStatus};
use crate::domain::webhook::WebhookPayload;
use crate::gateways::PaymentGateway;
use crate::signature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockBehavior {
    #[default]
    AlwaysSuccess,
    AlwaysDecline,
    AlwaysError,
}

#[derive(Debug)]
pub struct MockGateway {
    pub gateway_name: String,
    pub mode: Mode,
    pub behavior: MockBehavior,
    pub webhook_secret: Option<String>,
    pub refunds_enabled: bool,
    pub max_refund: Option<Decimal>,
}

impl MockGateway {
    pub fn new(gateway_name: &str, mode: Mode) -> Self {
        Self {
            gateway_name: gateway_name.to_lowercase(),
            mode,
            behavior: MockBehavior::AlwaysSuccess,
            webhook_secret: None,
            refunds_enabled: false,
            max_refund: None,
        }
    }

    pub fn from_settings(gateway_name: &str, settings: &GatewaySettings) -> Self {
        let mode = settings.resolved_mode(Mode::Sandbox);
        let mut gateway = Self::new(gateway_name, mode);
        gateway.webhook_secret = settings.webhook_secret.clone();
        gateway
    }

    pub fn factory(
        gateway_name: &'static str,
    ) -> impl Fn(GatewaySettings) -> Result<Arc<dyn PaymentGateway>> {
        move |settings| {
            Ok(Arc::new(Self::from_settings(gateway_name, &settings)) as Arc<dyn PaymentGateway>)
        }
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_refunds(mut self, max_refund: Option<Decimal>) -> Self {
        self.refunds_enabled = true;
        self.max_refund = max_refund;
        self
    }

    pub fn with_webhook_secret(mut self, secret: &str) -> Self {
        self.webhook_secret = Some(secret.to_string());
        self
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &str {
        &self.gateway_name
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn supports_refund(&self) -> bool {
        self.refunds_enabled
    }

    async fn pay(&self, request: &PaymentRequest) -> Result<PaymentResponse> {
        match self.behavior {
            MockBehavior::AlwaysError => anyhow::bail!("mock gateway forced error"),
            MockBehavior::AlwaysDecline => Ok(PaymentResponse::failed(
                PaymentStatus::Failed,
                "mock decline",
            )
            .with_gateway_reference(&request.order_id)),
            MockBehavior::AlwaysSuccess => {
                let transaction_id = format!("mock_txn_{}", uuid::Uuid::new_v4());
                Ok(
                    PaymentResponse::succeeded(PaymentStatus::Completed, &transaction_id)
                        .with_amount(request.amount, &request.currency)
                        .with_gateway_reference(&request.order_id)
                        .with_data("amount", serde_json::to_value(request.amount)?)
                        .with_data("currency", serde_json::json!(request.currency)),
                )
            }
        }
    }

    async fn verify(&self, payload: &WebhookPayload) -> Result<PaymentResponse> {
        let secret = self
            .webhook_secret
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("webhook secret not configured for '{}'", self.name()))?;

        let signature = payload
            .signature
            .as_deref()
            .or_else(|| payload.header("x-signature"))
            .ok_or_else(|| anyhow::anyhow!("webhook payload carries no signature"))?;

        let canonical = serde_json::to_string(&payload.payload)?;
        signature::verify_or_fail(
            self.name(),
            canonical.as_bytes(),
            signature,
            secret,
            signature::DEFAULT_ALGORITHMS,
        )?;

        let status = payload
            .payload_str("status")
            .map(PaymentStatus::from_provider_code)
            .unwrap_or(PaymentStatus::Unknown);
        let transaction_id = payload
            .payload_str("transaction_id")
            .or_else(|| payload.payload_str("id"))
            .unwrap_or_default();

        Ok(PaymentResponse::from_status(status, transaction_id)
            .with_data("raw", payload.payload.clone()))
    }

    async fn refund(&self, transaction_id: &str, amount: Decimal) -> Result<bool> {
        if !self.refunds_enabled {
            anyhow::bail!("gateway '{}' does not support refunds", self.name());
        }
        if amount <= Decimal::ZERO {
            anyhow::bail!("refund amount must be greater than zero");
        }
        if let Some(max) = self.max_refund {
            if amount > max {
                anyhow::bail!(
                    "refund of {} exceeds refundable balance for {}",
                    amount,
                    transaction_id
                );
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn request() -> PaymentRequest {
        PaymentRequest::new("ORD-1", amount("100.00"), "USD", "a@b.com", "https://cb")
    }

    #[tokio::test]
    async fn success_echoes_amount_and_currency() {
        let gateway = MockGateway::new("mock", Mode::Sandbox);
        let response = gateway.pay(&request()).await.unwrap();
        assert!(response.success);
        assert_eq!(response.status, PaymentStatus::Completed);
        assert_eq!(response.amount, Some(amount("100.00")));
        assert_eq!(response.currency.as_deref(), Some("USD"));
        assert!(response
            .transaction_id
            .as_deref()
            .unwrap()
            .starts_with("mock_txn_"));
    }

    #[tokio::test]
    async fn decline_is_a_response_not_an_error() {
        let gateway =
            MockGateway::new("mock", Mode::Sandbox).with_behavior(MockBehavior::AlwaysDecline);
        let response = gateway.pay(&request()).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.status, PaymentStatus::Failed);
    }

    #[tokio::test]
    async fn refund_respects_eligibility_cap() {
        let gateway =
            MockGateway::new("mock", Mode::Sandbox).with_refunds(Some(amount("50.00")));
        assert!(gateway.refund("txn_1", amount("50.00")).await.unwrap());
        assert!(gateway.refund("txn_1", amount("50.01")).await.is_err());
        assert!(gateway.refund("txn_1", amount("0")).await.is_err());
    }
}
