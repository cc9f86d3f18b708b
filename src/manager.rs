use rust_decimal::Decimal;
use std::sync::{Arc, RwLock};

use crate::domain::request::PaymentRequest;
use crate::domain::response::PaymentResponse;
use crate::domain::webhook::WebhookPayload;
use crate::error::PaymentError;
use crate::registry::GatewayRegistry;

// Stateless façade over the registry; holds nothing beyond the
// default-gateway setting.
pub struct PaymentManager {
    registry: Arc<GatewayRegistry>,
    default_gateway: RwLock<Option<String>>,
}

impl PaymentManager {
    pub fn new(registry: Arc<GatewayRegistry>) -> Self {
        let default_gateway = registry
            .config()
            .default_gateway
            .clone()
            .map(|name| name.to_lowercase());
        Self {
            registry,
            default_gateway: RwLock::new(default_gateway),
        }
    }

    pub fn registry(&self) -> &Arc<GatewayRegistry> {
        &self.registry
    }

    pub async fn pay(
        &self,
        gateway: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, PaymentError> {
        request.validate()?;
        let adapter = self.registry.resolve(gateway)?;
        tracing::info!(
            "initiating payment for order {} via '{}'",
            request.order_id,
            adapter.name()
        );

        match adapter.pay(request).await {
            Ok(response) => {
                if !response.success {
                    tracing::warn!(
                        "payment for order {} did not succeed: {:?}",
                        request.order_id,
                        response.status
                    );
                }
                Ok(response)
            }
            Err(source) => Err(wrap(source, WrapKind::Pay)),
        }
    }

    pub async fn verify(
        &self,
        gateway: &str,
        payload: &WebhookPayload,
    ) -> Result<PaymentResponse, PaymentError> {
        let adapter = self.registry.resolve(gateway)?;
        tracing::info!("verifying inbound payload via '{}'", adapter.name());
        adapter
            .verify(payload)
            .await
            .map_err(|source| wrap(source, WrapKind::Verify))
    }

    pub async fn refund(
        &self,
        gateway: &str,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<bool, PaymentError> {
        let adapter = self.registry.resolve(gateway)?;
        if !adapter.supports_refund() {
            return Err(PaymentError::RefundUnsupported(adapter.name().to_string()));
        }
        tracing::info!(
            "refunding {} on transaction {} via '{}'",
            amount,
            transaction_id,
            adapter.name()
        );
        adapter
            .refund(transaction_id, amount)
            .await
            .map_err(|source| wrap(source, WrapKind::Refund))
    }

    pub async fn pay_with_default(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, PaymentError> {
        let gateway = self
            .default_gateway()
            .ok_or(PaymentError::NoDefaultGateway)?;
        self.pay(&gateway, request).await
    }

    pub fn set_default_gateway(&self, name: &str) -> Result<(), PaymentError> {
        let key = name.to_lowercase();
        if !self.registry.has_gateway(&key) {
            return Err(PaymentError::GatewayNotFound(key));
        }
        *self
            .default_gateway
            .write()
            .expect("default gateway lock poisoned") = Some(key);
        Ok(())
    }

    pub fn default_gateway(&self) -> Option<String> {
        self.default_gateway
            .read()
            .expect("default gateway lock poisoned")
            .clone()
    }
}

enum WrapKind {
    Pay,
    Verify,
    Refund,
}

// Typed errors the adapter already raised (notably invalid signatures) pass
// through; everything else gets the operation's stable prefix.
fn wrap(source: anyhow::Error, kind: WrapKind) -> PaymentError {
    match source.downcast::<PaymentError>() {
        Ok(err) => err,
        Err(source) => match kind {
            WrapKind::Pay => PaymentError::PaymentFailed { source },
            WrapKind::Verify => PaymentError::VerificationFailed { source },
            WrapKind::Refund => PaymentError::RefundFailed { source },
        },
    }
}
