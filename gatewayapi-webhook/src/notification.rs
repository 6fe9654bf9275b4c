//! Delivery-status notification record and claim projection.
//!
//! GatewayAPI reports the fate of a sent SMS by calling the account's
//! webhook URL; everything about the event travels as claims inside the
//! signed token. This module projects a verified claim map into an
//! immutable, fully-typed record.

use http::HeaderMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Result, WebhookError};
use crate::signature::{verify_token, SIGNATURE_HEADER};
use crate::status::{ChargeStatus, DeliveryStatus};

/// Claims every delivery-status payload must carry.
const REQUIRED_CLAIMS: [&str; 4] = ["id", "msisdn", "time", "status"];

/// A verified delivery-status notification.
///
/// Constructed only by the verification entry points below; immutable once
/// built. Optional claims absent from the payload are `None`, never empty
/// strings. Serializable so callers can forward or persist the record;
/// deliberately not deserializable, so the only way to obtain one is
/// through verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryStatusNotification {
    message_id: u64,
    phone_number: u64,
    timestamp: u64,
    status: String,
    user_reference: Option<String>,
    charge_status: Option<String>,
    country_code: Option<String>,
    country_prefix: Option<u64>,
    error_description: Option<String>,
    error_code: Option<String>,
}

impl DeliveryStatusNotification {
    /// Verify the signed token on an inbound webhook request and return the
    /// notification it describes.
    ///
    /// Reads the `X-Gwapi-Signature` header and delegates to
    /// [`from_token`](Self::from_token). The request body is never
    /// consulted. An absent or empty header fails with
    /// [`WebhookError::MissingSignature`]; a header value that is not
    /// visible ASCII cannot be a compact token and fails as malformed.
    pub fn from_request(headers: &HeaderMap, secret: &str) -> Result<Self> {
        let token = match headers.get(SIGNATURE_HEADER) {
            None => return Err(WebhookError::MissingSignature),
            Some(value) => value
                .to_str()
                .map_err(|_| WebhookError::malformed("signature header is not visible ASCII"))?,
        };

        if token.is_empty() {
            return Err(WebhookError::MissingSignature);
        }

        Self::from_token(token, secret)
    }

    /// Verify a bare token string already extracted from the request.
    pub fn from_token(token: &str, secret: &str) -> Result<Self> {
        let claims = verify_token(token, secret)?;
        Self::from_claims(&claims)
    }

    /// Project a verified claim map into the typed record.
    fn from_claims(claims: &Map<String, Value>) -> Result<Self> {
        let all_present = REQUIRED_CLAIMS.iter().all(|name| claims.contains_key(*name));
        if !all_present {
            let present: Vec<String> = claims.keys().cloned().collect();
            warn!(present = %present.join(","), "webhook_missing_required_claims");
            return Err(WebhookError::MissingClaims { present });
        }

        Ok(Self {
            message_id: required_integer(claims, "id")?,
            phone_number: required_integer(claims, "msisdn")?,
            timestamp: required_integer(claims, "time")?,
            status: required_string(claims, "status")?,
            user_reference: optional_string(claims, "userref")?,
            charge_status: optional_string(claims, "charge_status")?,
            country_code: optional_string(claims, "country_code")?,
            country_prefix: optional_integer(claims, "country_prefix")?,
            error_description: optional_string(claims, "error")?,
            error_code: optional_string(claims, "code")?,
        })
    }

    /// Provider message identifier.
    pub fn message_id(&self) -> u64 {
        self.message_id
    }

    /// Recipient MSISDN.
    pub fn phone_number(&self) -> u64 {
        self.phone_number
    }

    /// Unix time of the status event.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Delivery status exactly as the provider sent it.
    ///
    /// Not validated against the documented vocabulary; the provider may
    /// introduce new statuses independently of this crate.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Delivery status matched against the documented vocabulary, `None`
    /// for strings outside it.
    pub fn delivery_status(&self) -> Option<DeliveryStatus> {
        DeliveryStatus::parse(&self.status)
    }

    /// Caller-supplied correlation id, if the original send carried one.
    pub fn user_reference(&self) -> Option<&str> {
        self.user_reference.as_deref()
    }

    /// Billing status exactly as the provider sent it.
    pub fn charge_status(&self) -> Option<&str> {
        self.charge_status.as_deref()
    }

    /// Billing status matched against the documented vocabulary.
    pub fn known_charge_status(&self) -> Option<ChargeStatus> {
        self.charge_status.as_deref().and_then(ChargeStatus::parse)
    }

    /// ISO country code of the recipient, when reported.
    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    /// International dialing prefix of the recipient, when reported.
    pub fn country_prefix(&self) -> Option<u64> {
        self.country_prefix
    }

    /// Human-readable error description, present only on failed sends.
    pub fn error_description(&self) -> Option<&str> {
        self.error_description.as_deref()
    }

    /// Provider error code, present only on failed sends.
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }
}

/// Integer claim that must be present. Non-negative JSON integers only; no
/// coercion from strings or floats.
fn required_integer(claims: &Map<String, Value>, name: &str) -> Result<u64> {
    optional_integer(claims, name)?.ok_or_else(|| WebhookError::MissingClaims {
        present: claims.keys().cloned().collect(),
    })
}

/// String claim that must be present.
fn required_string(claims: &Map<String, Value>, name: &str) -> Result<String> {
    optional_string(claims, name)?.ok_or_else(|| WebhookError::MissingClaims {
        present: claims.keys().cloned().collect(),
    })
}

fn optional_integer(claims: &Map<String, Value>, name: &str) -> Result<Option<u64>> {
    match claims.get(name) {
        None => Ok(None),
        Some(value) => match value.as_u64() {
            Some(n) => Ok(Some(n)),
            None => Err(WebhookError::malformed(format!(
                "claim `{name}` is not a non-negative integer"
            ))),
        },
    }
}

fn optional_string(claims: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match claims.get(name) {
        None => Ok(None),
        Some(value) => match value.as_str() {
            Some(s) => Ok(Some(s.to_string())),
            None => Err(WebhookError::malformed(format!(
                "claim `{name}` is not a string"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::sign_token;
    use http::HeaderValue;
    use serde_json::json;

    const SECRET: &str = "test-webhook-secret";

    fn full_claims() -> Value {
        json!({
            "id": 1000001,
            "msisdn": 4587654321u64,
            "time": 1568031600,
            "status": "DELIVERED",
            "userref": "order-42",
            "charge_status": "CAPTURED",
            "country_code": "DK",
            "country_prefix": 45,
            "error": "Absent Subscriber",
            "code": "0x0B"
        })
    }

    fn request_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(token).unwrap());
        headers
    }

    #[test]
    fn test_from_token_all_claims() {
        let token = sign_token(&full_claims(), SECRET);

        let notification = DeliveryStatusNotification::from_token(&token, SECRET).unwrap();

        assert_eq!(notification.message_id(), 1000001);
        assert_eq!(notification.phone_number(), 4587654321);
        assert_eq!(notification.timestamp(), 1568031600);
        assert_eq!(notification.status(), "DELIVERED");
        assert_eq!(notification.user_reference(), Some("order-42"));
        assert_eq!(notification.charge_status(), Some("CAPTURED"));
        assert_eq!(notification.country_code(), Some("DK"));
        assert_eq!(notification.country_prefix(), Some(45));
        assert_eq!(notification.error_description(), Some("Absent Subscriber"));
        assert_eq!(notification.error_code(), Some("0x0B"));
    }

    #[test]
    fn test_from_token_optional_claims_absent() {
        let token = sign_token(
            &json!({
                "id": 7,
                "msisdn": 4512345678u64,
                "time": 1568031600,
                "status": "EXPIRED"
            }),
            SECRET,
        );

        let notification = DeliveryStatusNotification::from_token(&token, SECRET).unwrap();

        assert_eq!(notification.user_reference(), None);
        assert_eq!(notification.charge_status(), None);
        assert_eq!(notification.country_code(), None);
        assert_eq!(notification.country_prefix(), None);
        assert_eq!(notification.error_description(), None);
        assert_eq!(notification.error_code(), None);
    }

    #[test]
    fn test_from_token_missing_time_lists_present_claims() {
        let token = sign_token(
            &json!({
                "id": 7,
                "msisdn": 4512345678u64,
                "status": "DELIVERED"
            }),
            SECRET,
        );

        let result = DeliveryStatusNotification::from_token(&token, SECRET);

        match result {
            Err(WebhookError::MissingClaims { present }) => {
                assert_eq!(present, vec!["id", "msisdn", "status"]);
            }
            other => panic!("expected MissingClaims, got {other:?}"),
        }
    }

    #[test]
    fn test_from_token_missing_claims_error_message() {
        let token = sign_token(&json!({ "id": 7 }), SECRET);

        let err = DeliveryStatusNotification::from_token(&token, SECRET).unwrap_err();

        assert_eq!(
            err.to_string(),
            "webhook payload missing required claims, got: id"
        );
    }

    #[test]
    fn test_from_token_non_numeric_required_claim() {
        let token = sign_token(
            &json!({
                "id": "not-a-number",
                "msisdn": 4512345678u64,
                "time": 1568031600,
                "status": "DELIVERED"
            }),
            SECRET,
        );

        let result = DeliveryStatusNotification::from_token(&token, SECRET);

        assert!(matches!(result, Err(WebhookError::MalformedToken { .. })));
    }

    #[test]
    fn test_from_token_non_numeric_optional_claim() {
        let token = sign_token(
            &json!({
                "id": 7,
                "msisdn": 4512345678u64,
                "time": 1568031600,
                "status": "DELIVERED",
                "country_prefix": "45"
            }),
            SECRET,
        );

        let result = DeliveryStatusNotification::from_token(&token, SECRET);

        assert!(matches!(result, Err(WebhookError::MalformedToken { .. })));
    }

    #[test]
    fn test_from_token_non_string_status() {
        let token = sign_token(
            &json!({
                "id": 7,
                "msisdn": 4512345678u64,
                "time": 1568031600,
                "status": 3
            }),
            SECRET,
        );

        let result = DeliveryStatusNotification::from_token(&token, SECRET);

        assert!(matches!(result, Err(WebhookError::MalformedToken { .. })));
    }

    #[test]
    fn test_from_token_status_outside_vocabulary_passes_through() {
        let token = sign_token(
            &json!({
                "id": 7,
                "msisdn": 4512345678u64,
                "time": 1568031600,
                "status": "SOME_FUTURE_STATUS",
                "charge_status": "SOME_FUTURE_CHARGE"
            }),
            SECRET,
        );

        let notification = DeliveryStatusNotification::from_token(&token, SECRET).unwrap();

        assert_eq!(notification.status(), "SOME_FUTURE_STATUS");
        assert_eq!(notification.delivery_status(), None);
        assert_eq!(notification.charge_status(), Some("SOME_FUTURE_CHARGE"));
        assert_eq!(notification.known_charge_status(), None);
    }

    #[test]
    fn test_from_token_known_vocabulary_accessors() {
        let token = sign_token(&full_claims(), SECRET);

        let notification = DeliveryStatusNotification::from_token(&token, SECRET).unwrap();

        assert_eq!(
            notification.delivery_status(),
            Some(DeliveryStatus::Delivered)
        );
        assert_eq!(
            notification.known_charge_status(),
            Some(ChargeStatus::Captured)
        );
    }

    #[test]
    fn test_from_request_valid() {
        let token = sign_token(&full_claims(), SECRET);
        let headers = request_headers(&token);

        let notification = DeliveryStatusNotification::from_request(&headers, SECRET).unwrap();

        assert_eq!(notification.message_id(), 1000001);
    }

    #[test]
    fn test_from_request_header_absent() {
        let headers = HeaderMap::new();

        let result = DeliveryStatusNotification::from_request(&headers, SECRET);

        assert!(matches!(result, Err(WebhookError::MissingSignature)));
    }

    #[test]
    fn test_from_request_header_empty() {
        let headers = request_headers("");

        let result = DeliveryStatusNotification::from_request(&headers, SECRET);

        assert!(matches!(result, Err(WebhookError::MissingSignature)));
    }

    #[test]
    fn test_from_request_header_not_ascii() {
        let mut headers = HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_bytes(&[0xff, 0xfe, 0xfd]).unwrap(),
        );

        let result = DeliveryStatusNotification::from_request(&headers, SECRET);

        assert!(matches!(result, Err(WebhookError::MalformedToken { .. })));
    }

    #[test]
    fn test_verification_is_idempotent() {
        let token = sign_token(&full_claims(), SECRET);
        let headers = request_headers(&token);

        let first = DeliveryStatusNotification::from_request(&headers, SECRET).unwrap();
        let second = DeliveryStatusNotification::from_request(&headers, SECRET).unwrap();

        assert_eq!(first, second);
    }
}
