//! Base64url codec without padding, as used for every JWS segment
//! (RFC 7515, section 2).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

pub fn encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes base64url data. Padding characters, characters outside the
/// url-safe alphabet and impossible lengths are all rejected.
pub fn decode(data: impl AsRef<[u8]>) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(data)
}

/// Whether `data` is shaped like unpadded base64url: only characters
/// from the url-safe alphabet, with a length a decoder could accept.
pub fn is_base64url(data: &str) -> bool {
    data.len() % 4 != 1
        && data.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
