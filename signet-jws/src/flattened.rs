use serde::{Deserialize, Serialize};
use serde_json::Value;
use signet_crypto::{sign, verify, Algorithm, Key};

use crate::base64url;
use crate::error::{Error, Result};
use crate::header::{HeaderMap, JoseHeader};
use crate::validate::validate_jose_header;

/// A JWS in the flattened JSON serialization (RFC 7515, section 7.2.2).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedJws {
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderMap>,
    pub signature: String,
}

/// The outcome of a successful verification: the decoded payload and the
/// validated effective header of the signature that verified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedJws {
    pub payload: Vec<u8>,
    pub header: JoseHeader,
}

#[derive(Clone, Debug, Default)]
pub struct VerifyOptions {
    /// When set, the `alg` header parameter must name one of these
    /// algorithms. When `None`, any registered algorithm is acceptable.
    pub allowed_algorithms: Option<Vec<Algorithm>>,
}

/// Signs `payload` and assembles a JWS in the flattened JSON
/// serialization.
///
/// The header partitions are validated first; the signing algorithm is
/// taken from the `alg` parameter of the effective header. The signing
/// input is `base64url(protected) || '.' || base64url(payload)`, with an
/// empty first half when no protected header is given.
///
/// # Examples
///
/// ```
/// use signet_crypto::Key;
/// use signet_jws::{create_flattened, verify_flattened, HeaderMap, VerifyOptions};
///
/// # fn main() -> signet_jws::Result<()> {
/// let key = Key::secret([0x0b; 32]);
/// let mut protected = HeaderMap::new();
/// protected.insert("alg".to_string(), "HS256".into());
///
/// let jws = create_flattened(b"hello", Some(&protected), None, &key)?;
/// let verified = verify_flattened(
///     &serde_json::to_string(&jws)?,
///     &key,
///     &VerifyOptions::default(),
/// )?;
/// assert_eq!(verified.payload, b"hello");
/// # Ok(())
/// # }
/// ```
pub fn create_flattened(
    payload: &[u8],
    protected: Option<&HeaderMap>,
    unprotected: Option<&HeaderMap>,
    key: &Key,
) -> Result<FlattenedJws> {
    let header = validate_jose_header(protected, unprotected, None)?;
    let encoded_payload = base64url::encode(payload);
    let encoded_protected = match protected {
        Some(map) => Some(base64url::encode(serde_json::to_vec(map)?)),
        None => None,
    };
    let input = signing_input(encoded_protected.as_deref(), &encoded_payload);
    let signature = sign(header.algorithm(), key, input.as_bytes())?;
    Ok(FlattenedJws {
        payload: encoded_payload,
        protected: encoded_protected,
        header: unprotected.cloned(),
        signature: base64url::encode(signature),
    })
}

/// Parses and verifies a JWS in the flattened JSON serialization,
/// returning the decoded payload and effective header.
///
/// Verification fails closed: any structural, header or signature
/// problem is reported as an error, never as a partial result.
pub fn verify_flattened(jws: &str, key: &Key, options: &VerifyOptions) -> Result<VerifiedJws> {
    let value: Value = serde_json::from_str(jws)
        .map_err(|_| Error::InvalidFormat("the serialization must be valid JSON"))?;
    let Some(object) = value.as_object() else {
        return Err(Error::InvalidFormat("the serialization must be a JSON object"));
    };
    let (payload, protected, header, signature) = flattened_members(object)?;
    verify_parts(payload, protected, header, signature, key, options)
}

/// Pulls the four members of a flattened serialization out of a parsed
/// JSON object, enforcing their wire types.
pub(crate) fn flattened_members<'a>(
    object: &'a HeaderMap,
) -> Result<(&'a str, Option<&'a str>, Option<&'a HeaderMap>, &'a str)> {
    let payload = match object.get("payload") {
        Some(Value::String(payload)) => payload.as_str(),
        Some(_) => return Err(Error::InvalidFormat(r#"the "payload" member must be a string"#)),
        None => return Err(Error::InvalidFormat(r#"a "payload" member is required"#)),
    };
    let signature = match object.get("signature") {
        Some(Value::String(signature)) => signature.as_str(),
        Some(_) => {
            return Err(Error::InvalidFormat(r#"the "signature" member must be a string"#))
        }
        None => return Err(Error::InvalidFormat(r#"a "signature" member is required"#)),
    };
    let protected = match object.get("protected") {
        None => None,
        Some(Value::String(protected)) => Some(protected.as_str()),
        Some(_) => {
            return Err(Error::InvalidFormat(r#"the "protected" member must be a string"#))
        }
    };
    let header = match object.get("header") {
        None => None,
        Some(Value::Object(header)) => Some(header),
        Some(_) => return Err(Error::InvalidUnprotectedHeader("must be a JSON object")),
    };
    Ok((payload, protected, header, signature))
}

pub(crate) fn verify_parts(
    encoded_payload: &str,
    encoded_protected: Option<&str>,
    unprotected: Option<&HeaderMap>,
    encoded_signature: &str,
    key: &Key,
    options: &VerifyOptions,
) -> Result<VerifiedJws> {
    let protected = match encoded_protected {
        None => None,
        Some(encoded) => {
            let bytes = base64url::decode(encoded)
                .map_err(|_| Error::InvalidProtectedHeader("must be base64url-encoded JSON"))?;
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => Some(map),
                Ok(_) => return Err(Error::InvalidProtectedHeader("must encode a JSON object")),
                Err(_) => return Err(Error::InvalidProtectedHeader("must encode valid JSON")),
            }
        }
    };
    let header = validate_jose_header(
        protected.as_ref(),
        unprotected,
        options.allowed_algorithms.as_deref(),
    )?;
    let payload = base64url::decode(encoded_payload).map_err(|_| Error::InvalidPayload)?;
    let signature =
        base64url::decode(encoded_signature).map_err(|_| Error::InvalidSignatureEncoding)?;
    // The signing input is recomputed from the wire segments, never from
    // a re-serialization of the parsed header.
    let input = signing_input(encoded_protected, encoded_payload);
    if !verify(header.algorithm(), key, input.as_bytes(), &signature)? {
        return Err(Error::InvalidSignature);
    }
    Ok(VerifiedJws { payload, header })
}

pub(crate) fn signing_input(encoded_protected: Option<&str>, encoded_payload: &str) -> String {
    format!("{}.{}", encoded_protected.unwrap_or_default(), encoded_payload)
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use serde_json::json;

    use super::*;

    fn header(value: Value) -> HeaderMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("test header must be an object"),
        }
    }

    fn hs256_key() -> Key {
        Key::secret([0x0b; 32])
    }

    fn verify_str(jws: &FlattenedJws, key: &Key) -> Result<VerifiedJws> {
        let serialized = serde_json::to_string(jws).expect("serialization should succeed");
        verify_flattened(&serialized, key, &VerifyOptions::default())
    }

    fn rsa_2048() -> &'static rsa::RsaPrivateKey {
        static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| {
            rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048)
                .expect("RSA key generation should succeed")
        })
    }

    #[test]
    fn hs256_round_trip() {
        let key = hs256_key();
        let protected = header(json!({"alg": "HS256"}));
        let jws = create_flattened(b"hello", Some(&protected), None, &key)
            .expect("creating should succeed");
        assert_eq!(jws.protected.as_deref(), Some("eyJhbGciOiJIUzI1NiJ9"));
        assert_eq!(jws.header, None);

        let verified = verify_str(&jws, &key).expect("verifying should succeed");
        assert_eq!(verified.payload, b"hello");
        assert_eq!(verified.header.algorithm(), Algorithm::HS256);
    }

    #[test]
    fn the_unprotected_partition_may_carry_the_algorithm() {
        let key = hs256_key();
        let unprotected = header(json!({"alg": "HS256", "kid": "key-1"}));
        let jws = create_flattened(b"hello", None, Some(&unprotected), &key)
            .expect("creating should succeed");
        assert_eq!(jws.protected, None);
        let serialized = serde_json::to_string(&jws).expect("serialization should succeed");
        assert!(!serialized.contains("protected"));

        let verified = verify_str(&jws, &key).expect("verifying should succeed");
        assert_eq!(verified.header.get("kid"), Some(&json!("key-1")));
    }

    #[test]
    fn both_partitions_merge_into_the_effective_header() {
        let key = hs256_key();
        let protected = header(json!({"alg": "HS256"}));
        let unprotected = header(json!({"kid": "key-1"}));
        let jws = create_flattened(b"hello", Some(&protected), Some(&unprotected), &key)
            .expect("creating should succeed");
        let verified = verify_str(&jws, &key).expect("verifying should succeed");
        assert_eq!(verified.header.get("kid"), Some(&json!("key-1")));
        assert_eq!(verified.header.parameters().len(), 2);
    }

    #[test]
    fn tampering_with_the_payload_is_detected() {
        let key = hs256_key();
        let protected = header(json!({"alg": "HS256"}));
        let mut jws = create_flattened(b"hello", Some(&protected), None, &key)
            .expect("creating should succeed");
        jws.payload = base64url::encode(b"evil");
        assert!(matches!(verify_str(&jws, &key), Err(Error::InvalidSignature)));
    }

    #[test]
    fn a_different_key_does_not_verify() {
        let key = hs256_key();
        let protected = header(json!({"alg": "HS256"}));
        let jws = create_flattened(b"hello", Some(&protected), None, &key)
            .expect("creating should succeed");
        let other = Key::secret([0x0c; 32]);
        assert!(matches!(verify_str(&jws, &other), Err(Error::InvalidSignature)));
    }

    #[test]
    fn verification_can_pin_the_algorithm() {
        let key = hs256_key();
        let protected = header(json!({"alg": "HS256"}));
        let jws = create_flattened(b"hello", Some(&protected), None, &key)
            .expect("creating should succeed");
        let serialized = serde_json::to_string(&jws).expect("serialization should succeed");

        let restrictive = VerifyOptions {
            allowed_algorithms: Some(vec![Algorithm::RS256]),
        };
        assert!(matches!(
            verify_flattened(&serialized, &key, &restrictive),
            Err(Error::UnsupportedAlgorithm(s)) if s == "HS256"
        ));

        let permissive = VerifyOptions {
            allowed_algorithms: Some(vec![Algorithm::HS256, Algorithm::ES256]),
        };
        assert!(verify_flattened(&serialized, &key, &permissive).is_ok());
    }

    #[test]
    fn both_header_partitions_may_be_missing_only_on_the_wire() {
        let key = hs256_key();
        assert!(matches!(
            create_flattened(b"hello", None, None, &key),
            Err(Error::MissingHeaders)
        ));
        assert!(matches!(
            verify_flattened(
                r#"{"payload":"aGVsbG8","signature":"AAAA"}"#,
                &key,
                &VerifyOptions::default(),
            ),
            Err(Error::MissingHeaders)
        ));
    }

    #[test]
    fn creation_rejects_overlapping_partitions() {
        let key = hs256_key();
        let protected = header(json!({"alg": "HS256"}));
        let unprotected = header(json!({"alg": "HS256"}));
        assert!(matches!(
            create_flattened(b"hello", Some(&protected), Some(&unprotected), &key),
            Err(Error::HeaderParametersNotDisjoint)
        ));
    }

    #[test]
    fn wire_structure_is_enforced() {
        let key = hs256_key();
        let options = VerifyOptions::default();
        let cases = [
            ("not json", "the serialization must be valid JSON"),
            ("[]", "the serialization must be a JSON object"),
            (r#"{"signature":"AAAA"}"#, r#"a "payload" member is required"#),
            (
                r#"{"payload":42,"signature":"AAAA"}"#,
                r#"the "payload" member must be a string"#,
            ),
            (r#"{"payload":"aGVsbG8"}"#, r#"a "signature" member is required"#),
            (
                r#"{"payload":"aGVsbG8","signature":"AAAA","protected":7}"#,
                r#"the "protected" member must be a string"#,
            ),
        ];
        for (serialized, reason) in cases {
            match verify_flattened(serialized, &key, &options) {
                Err(Error::InvalidFormat(actual)) => assert_eq!(actual, reason),
                other => panic!("expected a format error for {serialized}, got {other:?}"),
            }
        }
        assert!(matches!(
            verify_flattened(
                r#"{"payload":"aGVsbG8","signature":"AAAA","header":"x"}"#,
                &key,
                &options,
            ),
            Err(Error::InvalidUnprotectedHeader(_))
        ));
    }

    #[test]
    fn segment_encodings_are_enforced() {
        let key = hs256_key();
        let protected = header(json!({"alg": "HS256"}));
        let jws = create_flattened(b"hello", Some(&protected), None, &key)
            .expect("creating should succeed");

        let mut bad_protected = jws.clone();
        bad_protected.protected = Some("!!!".to_string());
        assert!(matches!(
            verify_str(&bad_protected, &key),
            Err(Error::InvalidProtectedHeader(_))
        ));

        let mut non_object = jws.clone();
        non_object.protected = Some(base64url::encode(b"[1,2]"));
        assert!(matches!(
            verify_str(&non_object, &key),
            Err(Error::InvalidProtectedHeader(_))
        ));

        let mut bad_payload = jws.clone();
        bad_payload.payload = "###".to_string();
        assert!(matches!(
            verify_str(&bad_payload, &key),
            Err(Error::InvalidPayload)
        ));

        let mut bad_signature = jws;
        bad_signature.signature = "###".to_string();
        assert!(matches!(
            verify_str(&bad_signature, &key),
            Err(Error::InvalidSignatureEncoding)
        ));
    }

    #[test]
    fn critical_custom_parameters_round_trip() {
        let key = hs256_key();
        let protected = header(json!({"alg": "HS256", "crit": ["exp"], "exp": 1700000000}));
        let jws = create_flattened(b"hello", Some(&protected), None, &key)
            .expect("creating should succeed");
        let verified = verify_str(&jws, &key).expect("verifying should succeed");
        assert_eq!(verified.header.get("exp"), Some(&json!(1700000000)));

        let dangling = header(json!({"alg": "HS256", "crit": ["exp"]}));
        assert!(matches!(
            create_flattened(b"hello", Some(&dangling), None, &key),
            Err(Error::HeaderParamInvalid { param: "crit", .. })
        ));
    }

    #[test]
    fn es256_round_trip() {
        let signing_key = p256::ecdsa::SigningKey::random(&mut rand::thread_rng());
        let public = Key::p256_public(*signing_key.verifying_key());
        let private = Key::p256_private(signing_key);
        let protected = header(json!({"alg": "ES256"}));
        let jws = create_flattened(b"hello", Some(&protected), None, &private)
            .expect("creating should succeed");
        let verified = verify_str(&jws, &public).expect("verifying should succeed");
        assert_eq!(verified.payload, b"hello");

        let unrelated = p256::ecdsa::SigningKey::random(&mut rand::thread_rng());
        let wrong = Key::p256_public(*unrelated.verifying_key());
        assert!(matches!(verify_str(&jws, &wrong), Err(Error::InvalidSignature)));
    }

    #[test]
    fn rsa_round_trips() {
        let protected = header(json!({"alg": "RS256"}));
        let private = Key::rsa_private(rsa_2048().clone());
        let public = Key::rsa_public(rsa_2048().to_public_key());
        let jws = create_flattened(b"hello", Some(&protected), None, &private)
            .expect("creating should succeed");
        let verified = verify_str(&jws, &public).expect("verifying should succeed");
        assert_eq!(verified.payload, b"hello");

        let protected = header(json!({"alg": "PS256"}));
        let private = Key::rsa_pss_private(rsa_2048().clone());
        let public = Key::rsa_pss_public(rsa_2048().to_public_key());
        let jws = create_flattened(b"hello", Some(&protected), None, &private)
            .expect("creating should succeed");
        let verified = verify_str(&jws, &public).expect("verifying should succeed");
        assert_eq!(verified.header.algorithm(), Algorithm::PS256);
    }
}
