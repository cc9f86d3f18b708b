use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// One inbound provider notification, captured at the transport boundary and
// handed to the adapter's verify path as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub gateway: String,
    pub payload: serde_json::Value,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl WebhookPayload {
    pub fn new(gateway: &str, payload: serde_json::Value) -> Self {
        Self {
            gateway: gateway.to_lowercase(),
            payload,
            signature: None,
            headers: HashMap::new(),
        }
    }

    pub fn with_signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v.as_str())
    }

    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}
