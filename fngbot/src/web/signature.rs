//! Slack request signature verification.
//!
//! Slack signs every request using HMAC-SHA256 over `v0:<timestamp>:<body>`.
//! Reference: https://api.slack.com/authentication/verifying-requests-from-slack

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";

/// Header carrying the request timestamp.
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

/// Version prefix of the signature scheme.
const SIGNATURE_VERSION: &str = "v0";

/// Compute the signature Slack would send for this request.
///
/// An empty secret is a valid HMAC key, so this always yields a digest.
pub fn expected_signature(secret: &str, timestamp: &str, body: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");

    mac.update(format!("{}:{}:{}", SIGNATURE_VERSION, timestamp, body).as_bytes());

    format!(
        "{}={}",
        SIGNATURE_VERSION,
        hex::encode(mac.finalize().into_bytes())
    )
}

/// Verify a Slack request signature.
///
/// # Arguments
///
/// * `secret` - The app's signing secret
/// * `body` - The raw request body, exactly as received
/// * `signature` - The `X-Slack-Signature` header value
/// * `timestamp` - The `X-Slack-Request-Timestamp` header value
///
/// # Returns
///
/// `true` if the signature matches, `false` otherwise.
pub fn validate_signature(secret: &str, body: &str, signature: &str, timestamp: &str) -> bool {
    let expected = expected_signature(secret, timestamp, body);

    debug!(
        calculated = %expected,
        signature = %signature,
        timestamp = %timestamp,
        body = %body,
        "signature_inputs"
    );

    let valid = constant_time_compare(&expected, signature);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature.len(),
            has_secret = !secret.is_empty(),
            "signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes().ct_eq(b.as_bytes()).into()
}
