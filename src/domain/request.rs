use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::PaymentError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub email: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub callback_url: String,
    #[serde(default)]
    pub notify_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub custom: HashMap<String, serde_json::Value>,
}

impl PaymentRequest {
    pub fn new(
        order_id: &str,
        amount: Decimal,
        currency: &str,
        email: &str,
        callback_url: &str,
    ) -> Self {
        Self {
            order_id: order_id.to_string(),
            amount,
            currency: currency.to_uppercase(),
            email: email.to_string(),
            customer_name: None,
            customer_phone: None,
            callback_url: callback_url.to_string(),
            notify_url: None,
            description: None,
            metadata: HashMap::new(),
            custom: HashMap::new(),
        }
    }

    // factory from a raw mapping; validates at the boundary
    pub fn from_value(value: serde_json::Value) -> Result<Self, PaymentError> {
        let mut request: PaymentRequest = serde_json::from_value(value)
            .map_err(|e| PaymentError::InvalidRequest(e.to_string()))?;
        request.currency = request.currency.to_uppercase();
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.order_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "order_id must not be empty".to_string(),
            ));
        }
        if self.amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidRequest(
                "amount must be greater than zero".to_string(),
            ));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PaymentError::InvalidRequest(
                "currency must be a 3-letter ISO 4217 code".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(PaymentError::InvalidRequest(
                "email is not a valid address".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn amount(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn valid_request_passes() {
        let req = PaymentRequest::new("ORD-1", amount("100.00"), "usd", "a@b.com", "https://cb");
        assert!(req.validate().is_ok());
        assert_eq!(req.currency, "USD");
    }

    #[test]
    fn rejects_non_positive_amount() {
        let req = PaymentRequest::new("ORD-1", amount("0"), "USD", "a@b.com", "https://cb");
        assert!(matches!(
            req.validate(),
            Err(PaymentError::InvalidRequest(_))
        ));

        let req = PaymentRequest::new("ORD-1", amount("-5.00"), "USD", "a@b.com", "https://cb");
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_bad_currency() {
        for bad in ["US", "USDT", "U1D", ""] {
            let req = PaymentRequest::new("ORD-1", amount("10"), bad, "a@b.com", "https://cb");
            assert!(req.validate().is_err(), "currency {:?} accepted", bad);
        }
    }

    #[test]
    fn rejects_empty_order_id() {
        let req = PaymentRequest::new("  ", amount("10"), "USD", "a@b.com", "https://cb");
        assert!(req.validate().is_err());
    }

    #[test]
    fn from_value_validates_and_normalizes() {
        let req = PaymentRequest::from_value(json!({
            "order_id": "ORD-1",
            "amount": "100.00",
            "currency": "usd",
            "email": "a@b.com",
            "callback_url": "https://example.com/return",
            "metadata": {"plan": "gold"}
        }))
        .unwrap();
        assert_eq!(req.currency, "USD");
        assert_eq!(req.amount, amount("100.00"));
        assert_eq!(req.metadata["plan"], json!("gold"));
    }

    #[test]
    fn from_value_rejects_invalid_mapping() {
        let err = PaymentRequest::from_value(json!({
            "order_id": "ORD-1",
            "amount": "0",
            "currency": "USD",
            "email": "a@b.com",
            "callback_url": "https://cb"
        }))
        .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidRequest(_)));
    }
}
