use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
    Refunded,
    PartiallyRefunded,
    Expired,
    Authorized,
    Processing,
    Disputed,
    Reversed,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    // the only statuses allowed to carry success == true
    pub fn indicates_success(self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed | PaymentStatus::Authorized | PaymentStatus::Processing
        )
    }

    // unmapped codes resolve to Unknown, never to an error
    pub fn from_provider_code(code: &str) -> PaymentStatus {
        match code.to_lowercase().as_str() {
            "pending" => PaymentStatus::Pending,
            "completed" => PaymentStatus::Completed,
            "failed" => PaymentStatus::Failed,
            "cancelled" | "canceled" => PaymentStatus::Cancelled,
            "refunded" => PaymentStatus::Refunded,
            "partially_refunded" => PaymentStatus::PartiallyRefunded,
            "expired" => PaymentStatus::Expired,
            "authorized" => PaymentStatus::Authorized,
            "processing" => PaymentStatus::Processing,
            "disputed" => PaymentStatus::Disputed,
            "reversed" => PaymentStatus::Reversed,
            _ => PaymentStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub gateway_reference: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl PaymentResponse {
    // success is derived from the status so a success flag can never
    // accompany a non-success status
    pub fn from_status(status: PaymentStatus, transaction_id: &str) -> Self {
        Self {
            success: status.indicates_success(),
            status,
            transaction_id: Some(transaction_id.to_string()),
            ..Self::empty()
        }
    }

    pub fn succeeded(status: PaymentStatus, transaction_id: &str) -> Self {
        Self::from_status(status, transaction_id)
    }

    pub fn failed(status: PaymentStatus, message: &str) -> Self {
        Self {
            success: false,
            status,
            message: Some(message.to_string()),
            ..Self::empty()
        }
    }

    fn empty() -> Self {
        Self {
            success: false,
            status: PaymentStatus::Unknown,
            transaction_id: None,
            redirect_url: None,
            message: None,
            data: HashMap::new(),
            gateway_reference: None,
            amount: None,
            currency: None,
            metadata: HashMap::new(),
        }
    }

    pub fn requires_redirect(&self) -> bool {
        self.redirect_url.is_some()
    }

    pub fn with_redirect_url(mut self, url: &str) -> Self {
        self.redirect_url = Some(url.to_string());
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn with_amount(mut self, amount: Decimal, currency: &str) -> Self {
        self.amount = Some(amount);
        self.currency = Some(currency.to_string());
        self
    }

    pub fn with_gateway_reference(mut self, reference: &str) -> Self {
        self.gateway_reference = Some(reference.to_string());
        self
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_flag_tracks_status() {
        assert!(PaymentResponse::succeeded(PaymentStatus::Completed, "t1").success);
        assert!(PaymentResponse::succeeded(PaymentStatus::Authorized, "t1").success);
        assert!(PaymentResponse::succeeded(PaymentStatus::Processing, "t1").success);
        assert!(!PaymentResponse::succeeded(PaymentStatus::Pending, "t1").success);
        assert!(!PaymentResponse::failed(PaymentStatus::Failed, "declined").success);
    }

    #[test]
    fn unknown_provider_codes_never_error() {
        assert_eq!(
            PaymentStatus::from_provider_code("TXN_SETTLED_42"),
            PaymentStatus::Unknown
        );
        assert_eq!(
            PaymentStatus::from_provider_code("COMPLETED"),
            PaymentStatus::Completed
        );
    }

    #[test]
    fn serde_round_trip_preserves_extras() {
        let response = PaymentResponse::succeeded(PaymentStatus::Completed, "txn_9")
            .with_amount("49.90".parse().unwrap(), "EUR")
            .with_data("provider_fee", serde_json::json!("0.35"));

        let json = serde_json::to_string(&response).unwrap();
        let back: PaymentResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, PaymentStatus::Completed);
        assert_eq!(back.transaction_id.as_deref(), Some("txn_9"));
        assert_eq!(back.data["provider_fee"], serde_json::json!("0.35"));
    }

    #[test]
    fn unknown_status_string_deserializes_to_unknown() {
        let status: PaymentStatus = serde_json::from_str("\"settled\"").unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }
}
