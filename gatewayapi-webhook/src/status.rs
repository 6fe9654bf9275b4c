//! Delivery and charge status vocabularies.
//!
//! The provider documents a fixed set of status strings. The notification
//! record never validates against them (the vocabulary may grow on the
//! provider side first); these enums exist so integrators can match on
//! well-known values without typo risk.

use std::fmt;

/// Message delivery states reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    /// Message state is unknown.
    Unknown,
    /// Scheduled for later delivery.
    Scheduled,
    /// Buffered upstream, awaiting the operator.
    Buffered,
    /// Handed to the operator, in transit.
    Enroute,
    /// Delivered to the handset.
    Delivered,
    /// Validity period expired before delivery.
    Expired,
    /// Deleted before delivery.
    Deleted,
    /// Operator reported the message undeliverable.
    Undeliverable,
    /// Accepted by the operator.
    Accepted,
    /// Rejected by the operator.
    Rejected,
    /// Skipped without a send attempt.
    Skipped,
}

impl DeliveryStatus {
    /// Wire string used by the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Scheduled => "SCHEDULED",
            Self::Buffered => "BUFFERED",
            Self::Enroute => "ENROUTE",
            Self::Delivered => "DELIVERED",
            Self::Expired => "EXPIRED",
            Self::Deleted => "DELETED",
            Self::Undeliverable => "UNDELIVERABLE",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Skipped => "SKIPPED",
        }
    }

    /// Match a provider status string against the documented vocabulary.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNKNOWN" => Some(Self::Unknown),
            "SCHEDULED" => Some(Self::Scheduled),
            "BUFFERED" => Some(Self::Buffered),
            "ENROUTE" => Some(Self::Enroute),
            "DELIVERED" => Some(Self::Delivered),
            "EXPIRED" => Some(Self::Expired),
            "DELETED" => Some(Self::Deleted),
            "UNDELIVERABLE" => Some(Self::Undeliverable),
            "ACCEPTED" => Some(Self::Accepted),
            "REJECTED" => Some(Self::Rejected),
            "SKIPPED" => Some(Self::Skipped),
            _ => None,
        }
    }

    /// Every documented delivery status.
    pub const ALL: [DeliveryStatus; 11] = [
        Self::Unknown,
        Self::Scheduled,
        Self::Buffered,
        Self::Enroute,
        Self::Delivered,
        Self::Expired,
        Self::Deleted,
        Self::Undeliverable,
        Self::Accepted,
        Self::Rejected,
        Self::Skipped,
    ];
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing outcomes for a metered send, reported asynchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeStatus {
    /// Message was free of charge.
    NoCharge,
    /// Charge authorized, not yet captured.
    Authorized,
    /// Charge cancelled.
    Cancelled,
    /// Charge captured.
    Captured,
    /// Charge attempt failed.
    Failed,
    /// Charge refunded.
    Refunded,
    /// Refund attempt failed.
    RefundFail,
}

impl ChargeStatus {
    /// Wire string used by the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCharge => "NOCHARGE",
            Self::Authorized => "AUTHORIZED",
            Self::Cancelled => "CANCELLED",
            Self::Captured => "CAPTURED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
            Self::RefundFail => "REFUND_FAIL",
        }
    }

    /// Match a provider charge-status string against the documented vocabulary.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOCHARGE" => Some(Self::NoCharge),
            "AUTHORIZED" => Some(Self::Authorized),
            "CANCELLED" => Some(Self::Cancelled),
            "CAPTURED" => Some(Self::Captured),
            "FAILED" => Some(Self::Failed),
            "REFUNDED" => Some(Self::Refunded),
            "REFUND_FAIL" => Some(Self::RefundFail),
            _ => None,
        }
    }

    /// Every documented charge status.
    pub const ALL: [ChargeStatus; 7] = [
        Self::NoCharge,
        Self::Authorized,
        Self::Cancelled,
        Self::Captured,
        Self::Failed,
        Self::Refunded,
        Self::RefundFail,
    ];
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
