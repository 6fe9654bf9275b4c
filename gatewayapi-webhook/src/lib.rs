//! GatewayAPI delivery-status webhook verification.
//!
//! GatewayAPI calls an account's webhook URL whenever the delivery state of
//! a sent SMS changes. The notification itself travels as claims inside a
//! signed compact token in the `X-Gwapi-Signature` request header; the
//! request body carries nothing this crate needs.
//!
//! This crate verifies the token's HMAC-SHA256 signature against the
//! account's shared secret and projects the claims into an immutable
//! [`DeliveryStatusNotification`] record:
//!
//! ```text
//! Inbound request → DeliveryStatusNotification::from_request(&headers, secret)
//!                 → typed record, or a WebhookError naming the failure
//! ```
//!
//! Transport, routing, persistence and retries stay with the embedding
//! application. Verification is one synchronous call with no shared state:
//! one HMAC computation and one JSON decode, safe to invoke concurrently
//! from any number of request handlers.

pub mod config;
pub mod error;
pub mod notification;
pub mod signature;
pub mod status;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, WebhookError};
pub use notification::DeliveryStatusNotification;
pub use signature::SIGNATURE_HEADER;
pub use status::{ChargeStatus, DeliveryStatus};
