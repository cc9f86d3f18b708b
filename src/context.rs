use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::request::PaymentRequest;
use crate::domain::response::{PaymentResponse, PaymentStatus};
use crate::error::PaymentError;
use crate::events::{EventSink, PaymentEvent};
use crate::manager::PaymentManager;

// Single-operation builder; publishes exactly one succeeded/failed event per
// execute(). Concurrent callers need separate contexts or the manager itself.
pub struct PaymentContext {
    manager: Arc<PaymentManager>,
    gateway: Option<String>,
    request: Option<PaymentRequest>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl PaymentContext {
    pub fn new(manager: Arc<PaymentManager>) -> Self {
        Self {
            manager,
            gateway: None,
            request: None,
            sinks: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) -> &mut Self {
        self.sinks.push(sink);
        self
    }

    pub fn using(&mut self, gateway: &str) -> &mut Self {
        self.gateway = Some(gateway.to_lowercase());
        self
    }

    pub fn with(&mut self, request: PaymentRequest) -> &mut Self {
        self.request = Some(request);
        self
    }

    // Back to unconfigured; subscribers stay.
    pub fn reset(&mut self) -> &mut Self {
        self.gateway = None;
        self.request = None;
        self
    }

    pub async fn execute(&mut self) -> Result<PaymentResponse, PaymentError> {
        let gateway = self
            .gateway
            .clone()
            .ok_or(PaymentError::ContextState("no gateway selected"))?;
        // Consuming the request makes a second execute() without with() a
        // precondition error rather than a silent duplicate charge.
        let request = self
            .request
            .take()
            .ok_or(PaymentError::ContextState("no payment request attached"))?;

        self.publish(PaymentEvent::Initiated {
            gateway: gateway.clone(),
            request: request.clone(),
        });

        match self.manager.pay(&gateway, &request).await {
            Ok(response) => {
                let event = if response.success {
                    PaymentEvent::Succeeded {
                        gateway,
                        request,
                        response: response.clone(),
                    }
                } else {
                    PaymentEvent::Failed {
                        gateway,
                        request,
                        response: response.clone(),
                    }
                };
                self.publish(event);
                Ok(response)
            }
            Err(err) => {
                let response = PaymentResponse::failed(PaymentStatus::Failed, &err.to_string());
                self.publish(PaymentEvent::Failed {
                    gateway,
                    request,
                    response,
                });
                Err(err)
            }
        }
    }

    pub async fn refund(
        &mut self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<bool, PaymentError> {
        let gateway = self
            .gateway
            .clone()
            .ok_or(PaymentError::ContextState("no gateway selected"))?;

        let refunded = self.manager.refund(&gateway, transaction_id, amount).await?;
        if refunded {
            self.publish(PaymentEvent::Refunded {
                gateway,
                transaction_id: transaction_id.to_string(),
                amount,
            });
        }
        Ok(refunded)
    }

    fn publish(&self, event: PaymentEvent) {
        for sink in &self.sinks {
            sink.publish(&event);
        }
    }
}
