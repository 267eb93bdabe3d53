use thiserror::Error;

/// Errors surfaced by a transport implementation at the send/receive
/// boundary. The synchronization core never recovers these itself; it
/// stops scheduling for the affected connection and reports the teardown
/// through the disconnect hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection has been torn down
    #[error("connection closed")]
    Closed,
    /// The underlying transport reported a delivery failure
    #[error("delivery failed: {reason}")]
    DeliveryFailed { reason: String },
}
