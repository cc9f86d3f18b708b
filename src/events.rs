use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::request::PaymentRequest;
use crate::domain::response::PaymentResponse;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PaymentEvent {
    Initiated {
        gateway: String,
        request: PaymentRequest,
    },
    Succeeded {
        gateway: String,
        request: PaymentRequest,
        response: PaymentResponse,
    },
    Failed {
        gateway: String,
        request: PaymentRequest,
        response: PaymentResponse,
    },
    Refunded {
        gateway: String,
        transaction_id: String,
        amount: Decimal,
    },
}

pub trait EventSink: Send + Sync {
    fn publish(&self, event: &PaymentEvent);
}
