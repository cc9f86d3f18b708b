pub mod config;
pub mod context;
pub mod domain {
    pub mod request;
    pub mod response;
    pub mod webhook;
}
pub mod error;
pub mod events;
pub mod gateways;
pub mod manager;
pub mod registry;
pub mod signature;

pub use config::{Credentials, GatewaySettings, Mode, PaymentsConfig};
pub use context::PaymentContext;
pub use domain::request::PaymentRequest;
pub use domain::response::{PaymentResponse, PaymentStatus};
pub use domain::webhook::WebhookPayload;
pub use error::PaymentError;
pub use events::{EventSink, PaymentEvent};
pub use gateways::PaymentGateway;
pub use manager::PaymentManager;
pub use registry::GatewayRegistry;
