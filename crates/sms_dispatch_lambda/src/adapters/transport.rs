use sms_dispatch_core::contract::{DispatchRequest, PublishedEntry};

/// Failure modes of the outbound messaging services. A missing destination
/// topic surfaces as `Configuration`; callers treat both variants as the same
/// unrecoverable delivery failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Configuration(String),
    Delivery(String),
}

impl TransportError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery(message.into())
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(message) => write!(f, "configuration error: {message}"),
            Self::Delivery(message) => write!(f, "delivery error: {message}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Single-attempt pass-through to the pub/sub topic and the SMS delivery
/// service; no retries happen at this layer.
pub trait MessageTransport {
    /// Publishes an entry to the destination topic, tagging it with the
    /// supplied correlation id.
    fn publish(
        &self,
        entry: &PublishedEntry,
        correlation_id: Option<&str>,
    ) -> Result<(), TransportError>;

    /// Sends one SMS directly to the delivery's phone number.
    fn send_sms(&self, delivery: &DispatchRequest) -> Result<(), TransportError>;
}
