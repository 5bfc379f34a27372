use ecdsa::elliptic_curve::{generic_array::ArrayLength, PrimeCurve};
use ecdsa::signature::Verifier;
use ecdsa::{Signature, SignatureSize};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use rsa::traits::SignatureScheme;
use rsa::{Pkcs1v15Sign, Pss, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::key::Key;
use crate::sign::hmac_tag;
use crate::validate;

/// Checks `signature` over `signing_input` with `key` using `algorithm`.
///
/// Returns `Ok(false)` for a well-formed signature that does not match,
/// and an error when the key does not fit the algorithm or, for the ECDSA
/// algorithms, when the signature does not have the fixed `r || s` length.
/// HMAC tags are compared in constant time.
pub fn verify(
    algorithm: Algorithm,
    key: &Key,
    signing_input: &[u8],
    signature: &[u8],
) -> Result<bool> {
    match algorithm {
        Algorithm::HS256 => hmac_matches::<Hmac<Sha256>>(
            validate::secret_key(key, algorithm)?,
            signing_input,
            signature,
        ),
        Algorithm::HS384 => hmac_matches::<Hmac<Sha384>>(
            validate::secret_key(key, algorithm)?,
            signing_input,
            signature,
        ),
        Algorithm::HS512 => hmac_matches::<Hmac<Sha512>>(
            validate::secret_key(key, algorithm)?,
            signing_input,
            signature,
        ),
        Algorithm::RS256 => Ok(rsa_verify(
            validate::rsa_verifying_key(key, algorithm)?,
            Pkcs1v15Sign::new::<Sha256>(),
            &Sha256::digest(signing_input),
            signature,
        )),
        Algorithm::RS384 => Ok(rsa_verify(
            validate::rsa_verifying_key(key, algorithm)?,
            Pkcs1v15Sign::new::<Sha384>(),
            &Sha384::digest(signing_input),
            signature,
        )),
        Algorithm::RS512 => Ok(rsa_verify(
            validate::rsa_verifying_key(key, algorithm)?,
            Pkcs1v15Sign::new::<Sha512>(),
            &Sha512::digest(signing_input),
            signature,
        )),
        Algorithm::ES256 => {
            let verifying_key = validate::p256_verifying_key(key, algorithm)?;
            check_signature_len(algorithm, signature)?;
            Ok(ecdsa_verify(verifying_key, signing_input, signature))
        }
        Algorithm::ES384 => {
            let verifying_key = validate::p384_verifying_key(key, algorithm)?;
            check_signature_len(algorithm, signature)?;
            Ok(ecdsa_verify(verifying_key, signing_input, signature))
        }
        Algorithm::ES512 => {
            let verifying_key = validate::p521_verifying_key(key, algorithm)?;
            check_signature_len(algorithm, signature)?;
            Ok(ecdsa_verify(verifying_key, signing_input, signature))
        }
        Algorithm::PS256 => Ok(rsa_verify(
            validate::rsa_verifying_key(key, algorithm)?,
            Pss::new::<Sha256>(),
            &Sha256::digest(signing_input),
            signature,
        )),
        Algorithm::PS384 => Ok(rsa_verify(
            validate::rsa_verifying_key(key, algorithm)?,
            Pss::new::<Sha384>(),
            &Sha384::digest(signing_input),
            signature,
        )),
        Algorithm::PS512 => Ok(rsa_verify(
            validate::rsa_verifying_key(key, algorithm)?,
            Pss::new::<Sha512>(),
            &Sha512::digest(signing_input),
            signature,
        )),
    }
}

fn check_signature_len(algorithm: Algorithm, signature: &[u8]) -> Result<()> {
    if let Some(expected) = algorithm.params().signature_bytes() {
        if signature.len() != expected {
            return Err(Error::InvalidSignatureLength {
                algorithm,
                expected,
            });
        }
    }
    Ok(())
}

// The comparison must not leak how many tag bytes matched, so it runs in
// constant time. A length mismatch is an ordinary mismatch.
fn hmac_matches<M: Mac + KeyInit>(
    secret: &[u8],
    signing_input: &[u8],
    signature: &[u8],
) -> Result<bool> {
    let tag = hmac_tag::<M>(secret, signing_input)?;
    Ok(tag.ct_eq(signature).into())
}

fn rsa_verify(
    key: &RsaPublicKey,
    padding: impl SignatureScheme,
    digest: &[u8],
    signature: &[u8],
) -> bool {
    key.verify(padding, digest, signature).is_ok()
}

fn ecdsa_verify<C>(key: &impl Verifier<Signature<C>>, signing_input: &[u8], signature: &[u8]) -> bool
where
    C: PrimeCurve,
    SignatureSize<C>: ArrayLength<u8>,
{
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify(signing_input, &signature).is_ok()
}
