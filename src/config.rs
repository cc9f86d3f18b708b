use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Sandbox,
    Live,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Sandbox => "sandbox",
            Mode::Live => "live",
        }
    }

    pub fn parse(value: &str) -> Mode {
        match value.to_lowercase().as_str() {
            "live" | "production" => Mode::Live,
            _ => Mode::Sandbox,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Sandbox
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials(pub HashMap<String, String>);

impl Credentials {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> anyhow::Result<&str> {
        self.get(key)
            .ok_or_else(|| anyhow::anyhow!("missing credential '{}'", key))
    }

    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewaySettings {
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub sandbox: Credentials,
    #[serde(default)]
    pub live: Credentials,
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

impl GatewaySettings {
    pub fn resolved_mode(&self, base: Mode) -> Mode {
        self.mode.unwrap_or(base)
    }

    pub fn active_credentials(&self, base: Mode) -> &Credentials {
        match self.resolved_mode(base) {
            Mode::Sandbox => &self.sandbox,
            Mode::Live => &self.live,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentsConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub default_gateway: Option<String>,
    #[serde(default)]
    pub gateways: HashMap<String, GatewaySettings>,
}

impl PaymentsConfig {
    pub fn from_env() -> Self {
        Self {
            mode: std::env::var("PAYMENTS_MODE")
                .map(|v| Mode::parse(&v))
                .unwrap_or_default(),
            default_gateway: std::env::var("PAYMENTS_DEFAULT_GATEWAY")
                .ok()
                .map(|v| v.to_lowercase()),
            gateways: HashMap::new(),
        }
    }

    pub fn with_gateway(mut self, name: &str, settings: GatewaySettings) -> Self {
        self.gateways.insert(name.to_lowercase(), settings);
        self
    }

    // per-gateway settings with the base mode already merged in
    pub fn settings_for(&self, name: &str) -> GatewaySettings {
        let mut settings = self
            .gateways
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or_default();
        settings.mode = Some(settings.resolved_mode(self.mode));
        settings
    }
}
