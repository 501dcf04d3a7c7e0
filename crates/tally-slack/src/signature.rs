//! Slack request-signature verification
//!
//! Incoming webhooks are authenticated with an HMAC-SHA256 signature over
//! `v0:<timestamp>:<body>`, keyed with the app's signing secret. The
//! comparison is constant-time and stale timestamps are rejected to limit
//! replay windows.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request signature
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Header carrying the request timestamp (unix seconds)
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Signature scheme version prefix
const VERSION: &str = "v0";

/// Maximum accepted clock skew between the request timestamp and now
const MAX_SKEW_SECS: i64 = 60 * 5;

/// Signature verification errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("request timestamp is not a unix epoch value")]
    InvalidTimestamp,

    #[error("request timestamp outside the accepted window")]
    StaleTimestamp,

    #[error("signature has an unknown version prefix")]
    UnknownVersion,

    #[error("signature is not valid hex")]
    MalformedSignature,

    #[error("signature mismatch")]
    Mismatch,
}

/// Verify a request signature against the raw body.
///
/// `timestamp` and `signature` are the raw header values; `now` is injected
/// so the skew check is testable.
pub fn verify_signature(
    signing_secret: &str,
    timestamp: &str,
    body: &[u8],
    signature: &str,
    now: DateTime<Utc>,
) -> Result<(), SignatureError> {
    let ts: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;

    if (now.timestamp() - ts).abs() > MAX_SKEW_SECS {
        return Err(SignatureError::StaleTimestamp);
    }

    let hex_digest = signature
        .strip_prefix(&format!("{VERSION}="))
        .ok_or(SignatureError::UnknownVersion)?;
    let expected = hex::decode(hex_digest).map_err(|_| SignatureError::MalformedSignature)?;

    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|_| SignatureError::Mismatch)?;
    mac.update(format!("{VERSION}:{ts}:").as_bytes());
    mac.update(body);

    // verify_slice is constant-time
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compute the signature header value for a body (used by tests and local
/// tooling to forge valid requests).
pub fn sign(signing_secret: &str, timestamp: i64, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(format!("{VERSION}:{timestamp}:").as_bytes());
    mac.update(body);
    format!("{VERSION}={}", hex::encode(mac.finalize().into_bytes()))
}
