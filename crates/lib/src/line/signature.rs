//! Webhook signature verification.
//!
//! LINE signs the raw request body with HMAC-SHA256 keyed by the channel
//! secret and sends the base64-encoded digest in the x-line-signature header.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify the x-line-signature header against the raw body. Returns false
/// for malformed base64 or a digest mismatch; the digest comparison is
/// constant-time.
pub fn verify(channel_secret: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(provided) = BASE64.decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}

/// Compute the base64 signature for a body (what the platform would send).
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("hmac-sha256 accepts keys of any length");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}
