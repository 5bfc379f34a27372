use serde::{Deserialize, Serialize};
use serde_json::Value;
use signet_crypto::Key;

use crate::base64url;
use crate::error::{Error, Result};
use crate::flattened::{create_flattened, verify_parts, VerifiedJws, VerifyOptions};
use crate::header::HeaderMap;

/// A JWS in the general JSON serialization (RFC 7515, section 7.2.1):
/// one payload carrying any number of signatures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralJws {
    pub payload: String,
    pub signatures: Vec<JwsSignature>,
}

/// One signature of a [`GeneralJws`], with its own header partitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsSignature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderMap>,
    pub signature: String,
}

/// One requested signature for [`create_general`]: the key to sign with
/// and the header partitions to place on that signature.
#[derive(Clone, Copy, Debug)]
pub struct SignatureEntry<'a> {
    pub protected: Option<&'a HeaderMap>,
    pub unprotected: Option<&'a HeaderMap>,
    pub key: &'a Key,
}

/// Signs `payload` once per entry and assembles a JWS in the general
/// JSON serialization.
///
/// Every entry is validated and signed independently, exactly as
/// [`create_flattened`] would, so the entries may use different
/// algorithms and keys. At least one entry is required.
pub fn create_general(payload: &[u8], entries: &[SignatureEntry<'_>]) -> Result<GeneralJws> {
    if entries.is_empty() {
        return Err(Error::InvalidFormat("at least one signature entry is required"));
    }
    let mut signatures = Vec::with_capacity(entries.len());
    for entry in entries {
        let flattened = create_flattened(payload, entry.protected, entry.unprotected, entry.key)?;
        signatures.push(JwsSignature {
            protected: flattened.protected,
            header: flattened.header,
            signature: flattened.signature,
        });
    }
    Ok(GeneralJws {
        payload: base64url::encode(payload),
        signatures,
    })
}

/// Parses and verifies a JWS in the general JSON serialization,
/// returning the decoded payload and the effective header of the first
/// signature that verifies with `key`.
///
/// The serialization is checked structurally as a whole first; a
/// malformed entry is rejected even when another entry would verify.
/// Signatures are then tried in order, and when none matches the error
/// of the last attempt is returned.
pub fn verify_general(jws: &str, key: &Key, options: &VerifyOptions) -> Result<VerifiedJws> {
    let value: Value = serde_json::from_str(jws)
        .map_err(|_| Error::InvalidFormat("the serialization must be valid JSON"))?;
    let Some(object) = value.as_object() else {
        return Err(Error::InvalidFormat("the serialization must be a JSON object"));
    };
    let payload = match object.get("payload") {
        Some(Value::String(payload)) => payload.as_str(),
        Some(_) => return Err(Error::InvalidFormat(r#"the "payload" member must be a string"#)),
        None => return Err(Error::InvalidFormat(r#"a "payload" member is required"#)),
    };
    let entries = match object.get("signatures") {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        Some(Value::Array(_)) => {
            return Err(Error::InvalidFormat(r#"the "signatures" member must not be empty"#))
        }
        Some(_) => {
            return Err(Error::InvalidFormat(r#"the "signatures" member must be an array"#))
        }
        None => return Err(Error::InvalidFormat(r#"a "signatures" member is required"#)),
    };
    let mut parsed = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(entry) = entry.as_object() else {
            return Err(Error::InvalidFormat("each signature entry must be a JSON object"));
        };
        parsed.push(signature_members(entry)?);
    }

    let mut last = Error::InvalidSignature;
    for (protected, header, signature) in parsed {
        match verify_parts(payload, protected, header, signature, key, options) {
            Ok(verified) => return Ok(verified),
            Err(error) => last = error,
        }
    }
    Err(last)
}

fn signature_members(entry: &HeaderMap) -> Result<(Option<&str>, Option<&HeaderMap>, &str)> {
    let signature = match entry.get("signature") {
        Some(Value::String(signature)) => signature.as_str(),
        Some(_) => {
            return Err(Error::InvalidFormat(r#"the "signature" member must be a string"#))
        }
        None => return Err(Error::InvalidFormat(r#"a "signature" member is required"#)),
    };
    let protected = match entry.get("protected") {
        None => None,
        Some(Value::String(protected)) => Some(protected.as_str()),
        Some(_) => {
            return Err(Error::InvalidFormat(r#"the "protected" member must be a string"#))
        }
    };
    let header = match entry.get("header") {
        None => None,
        Some(Value::Object(header)) => Some(header),
        Some(_) => return Err(Error::InvalidUnprotectedHeader("must be a JSON object")),
    };
    Ok((protected, header, signature))
}
