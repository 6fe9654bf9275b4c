//! Error types for webhook verification.
//!
//! Every failure aborts verification immediately and surfaces to the
//! caller as one of these categories; there is no retry or fallback path
//! inside this crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WebhookError>;

/// Failure categories for delivery-status webhook verification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The `X-Gwapi-Signature` header was absent or empty.
    #[error("missing webhook signature header")]
    MissingSignature,

    /// The token was structurally invalid: wrong segment count, invalid
    /// base64url, invalid JSON, or a claim carrying an unexpected value
    /// type.
    #[error("malformed webhook token: {reason}")]
    MalformedToken {
        /// Which structural check failed.
        reason: String,
    },

    /// The signature did not validate against the computed HMAC-SHA256, or
    /// the token declared a different signing algorithm.
    #[error("webhook signature verification failed")]
    SignatureMismatch,

    /// Required claims were absent from an otherwise valid, verified
    /// payload.
    #[error("webhook payload missing required claims, got: {}", present.join(","))]
    MissingClaims {
        /// Claim names that were present in the payload.
        present: Vec<String>,
    },
}

impl WebhookError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            reason: reason.into(),
        }
    }
}
