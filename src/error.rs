use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("gateway not found: {0}")]
    GatewayNotFound(String),

    #[error("failed to construct gateway '{gateway}': {source}")]
    GatewayConstruction {
        gateway: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("no default gateway configured")]
    NoDefaultGateway,

    #[error("invalid payment request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    ContextState(&'static str),

    #[error("Payment failed: {source}")]
    PaymentFailed {
        #[source]
        source: anyhow::Error,
    },

    #[error("Verification failed: {source}")]
    VerificationFailed {
        #[source]
        source: anyhow::Error,
    },

    #[error("Refund failed: {source}")]
    RefundFailed {
        #[source]
        source: anyhow::Error,
    },

    #[error("gateway '{0}' does not support refunds")]
    RefundUnsupported(String),

    #[error("invalid webhook signature for gateway '{0}'")]
    InvalidSignature(String),
}
