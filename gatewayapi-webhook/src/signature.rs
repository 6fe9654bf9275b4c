//! Compact signed-token parsing and HMAC-SHA256 verification.
//!
//! GatewayAPI signs each delivery-status webhook with a compact
//! three-segment token carried in the `X-Gwapi-Signature` request header:
//!
//! ```text
//! base64url(header-json) "." base64url(payload-json) "." base64url(signature)
//! ```
//!
//! The signature is HMAC-SHA256 over `header-segment "." payload-segment`,
//! keyed by the account's shared webhook secret. Segments use the URL-safe
//! base64 alphabet without padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::Sha256;
use tracing::{debug, warn};

use crate::error::{Result, WebhookError};

type HmacSha256 = Hmac<Sha256>;

/// Request header carrying the signed token.
pub const SIGNATURE_HEADER: &str = "X-Gwapi-Signature";

/// The only signing algorithm accepted for webhook tokens.
///
/// Tokens declaring any other algorithm are rejected before any HMAC work,
/// so a forged token cannot downgrade verification by self-declaring a
/// weaker scheme.
const EXPECTED_ALGORITHM: &str = "HS256";

/// Decoded token header segment. Fields other than `alg` are ignored.
#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
}

/// Verify a compact signed token and return its decoded claims.
///
/// Checks run in order: segment structure, declared algorithm, signature,
/// payload shape. The claims map is only handed back once the signature has
/// validated against `secret`.
pub fn verify_token(token: &str, secret: &str) -> Result<Map<String, Value>> {
    let mut segments = token.split('.');
    let (header_b64, payload_b64, signature_b64) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => {
            warn!(
                segments = token.split('.').count(),
                "webhook_token_bad_segment_count"
            );
            return Err(WebhookError::malformed(
                "expected three dot-separated segments",
            ));
        }
    };

    // All three segments must decode before any signature judgement is made.
    let header_bytes = decode_segment(header_b64, "header")?;
    let payload_bytes = decode_segment(payload_b64, "payload")?;
    let signature = decode_segment(signature_b64, "signature")?;

    let header: TokenHeader = serde_json::from_slice(&header_bytes).map_err(|e| {
        debug!(error = %e, "webhook_token_header_invalid");
        WebhookError::malformed("header segment is not a JSON object with an alg field")
    })?;

    if header.alg != EXPECTED_ALGORITHM {
        warn!(
            declared = %header.alg,
            expected = EXPECTED_ALGORITHM,
            "webhook_token_algorithm_rejected"
        );
        return Err(WebhookError::SignatureMismatch);
    }

    // The signature covers the encoded segments, not the decoded bytes.
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());
    let expected = mac.finalize().into_bytes();

    if !constant_time_eq(&expected, &signature) {
        warn!("webhook_signature_mismatch");
        return Err(WebhookError::SignatureMismatch);
    }

    let claims: Value = serde_json::from_slice(&payload_bytes).map_err(|e| {
        debug!(error = %e, "webhook_payload_invalid_json");
        WebhookError::malformed("payload segment is not valid JSON")
    })?;

    match claims {
        Value::Object(map) => Ok(map),
        _ => Err(WebhookError::malformed("payload is not a JSON object")),
    }
}

/// Decode one base64url segment.
fn decode_segment(segment: &str, which: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
        debug!(segment = which, error = %e, "webhook_token_segment_not_base64url");
        WebhookError::malformed(format!("{which} segment is not valid base64url"))
    })
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Build a signed token for the given claims, the way the provider would.
///
/// Test-only counterpart of `verify_token`; also used by the notification
/// tests to exercise the full extraction path.
#[cfg(test)]
pub(crate) fn sign_token(claims: &Value, secret: &str) -> String {
    sign_token_with_header(&serde_json::json!({ "alg": "HS256", "typ": "JWT" }), claims, secret)
}

/// Build a signed token with an explicit header segment.
#[cfg(test)]
pub(crate) fn sign_token_with_header(header: &Value, claims: &Value, secret: &str) -> String {
    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(header).unwrap());
    let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());
    let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    format!("{header_b64}.{payload_b64}.{signature_b64}")
}
