//! Configuration module for environment variable parsing.
//!
//! Only one value matters to this crate: the shared webhook secret. How it
//! is provisioned is up to the deployment; this module fixes the variable
//! name and the "is verification actually configured" check.

use std::env;

/// Webhook configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret used to validate webhook token signatures
    pub webhook_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            webhook_secret: env::var("GATEWAYAPI_WEBHOOK_SECRET").ok(),
        }
    }

    /// Whether a usable (non-blank) secret is configured.
    pub fn is_verification_enabled(&self) -> bool {
        self.webhook_secret
            .as_ref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}
