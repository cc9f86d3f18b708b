use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::{GatewaySettings, PaymentsConfig};
use crate::error::PaymentError;
use crate::gateways::PaymentGateway;

type GatewayFactory =
    Box<dyn Fn(GatewaySettings) -> anyhow::Result<Arc<dyn PaymentGateway>> + Send + Sync>;

#[derive(Default)]
struct Inner {
    factories: HashMap<String, GatewayFactory>,
    order: Vec<String>,
    cache: HashMap<String, Arc<dyn PaymentGateway>>,
}

pub struct GatewayRegistry {
    config: PaymentsConfig,
    inner: Mutex<Inner>,
}

impl GatewayRegistry {
    pub fn new(config: PaymentsConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn config(&self) -> &PaymentsConfig {
        &self.config
    }

    // Re-registering a key drops its cached instance.
    pub fn register<F>(&self, name: &str, factory: F)
    where
        F: Fn(GatewaySettings) -> anyhow::Result<Arc<dyn PaymentGateway>> + Send + Sync + 'static,
    {
        let key = name.to_lowercase();
        let mut inner = self.lock();
        if !inner.factories.contains_key(&key) {
            inner.order.push(key.clone());
        }
        inner.factories.insert(key.clone(), Box::new(factory));
        inner.cache.remove(&key);
    }

    // Construction happens under the lock: concurrent first resolution of
    // the same key yields exactly one instance.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn PaymentGateway>, PaymentError> {
        let key = name.to_lowercase();
        let mut inner = self.lock();

        if let Some(gateway) = inner.cache.get(&key) {
            return Ok(gateway.clone());
        }

        let factory = inner
            .factories
            .get(&key)
            .ok_or_else(|| PaymentError::GatewayNotFound(key.clone()))?;
        let settings = self.config.settings_for(&key);
        let gateway = factory(settings).map_err(|source| PaymentError::GatewayConstruction {
            gateway: key.clone(),
            source,
        })?;

        tracing::debug!(
            "constructed gateway '{}' in {} mode",
            key,
            gateway.mode().as_str()
        );
        inner.cache.insert(key, gateway.clone());
        Ok(gateway)
    }

    pub fn has_gateway(&self, name: &str) -> bool {
        self.lock().factories.contains_key(&name.to_lowercase())
    }

    // registration order
    pub fn available_gateways(&self) -> Vec<String> {
        self.lock().order.clone()
    }

    pub fn invalidate(&self, name: &str) {
        self.lock().cache.remove(&name.to_lowercase());
    }

    pub fn clear_cache(&self) {
        self.lock().cache.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("gateway registry lock poisoned")
    }
}
