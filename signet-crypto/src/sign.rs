use ecdsa::elliptic_curve::{generic_array::ArrayLength, PrimeCurve};
use ecdsa::signature::Signer;
use ecdsa::{Signature, SignatureSize};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use rsa::traits::SignatureScheme;
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::algorithm::Algorithm;
use crate::error::Result;
use crate::key::Key;
use crate::validate;

/// Signs `signing_input` with `key` using `algorithm` and returns the raw
/// signature bytes.
///
/// The key is validated against the algorithm before any cryptographic
/// operation runs. HMAC algorithms produce the MAC tag, RSA algorithms a
/// PKCS#1 v1.5 or PSS block of the modulus size, and the ECDSA algorithms
/// a fixed-size `r || s` concatenation (64, 96 or 132 bytes).
///
/// # Examples
///
/// ```
/// use signet_crypto::{sign, Algorithm, Key};
///
/// # fn main() -> signet_crypto::Result<()> {
/// let key = Key::secret([0x0b; 32]);
/// let signature = sign(Algorithm::HS256, &key, b"payload")?;
/// assert_eq!(signature.len(), 32);
/// # Ok(())
/// # }
/// ```
pub fn sign(algorithm: Algorithm, key: &Key, signing_input: &[u8]) -> Result<Vec<u8>> {
    match algorithm {
        Algorithm::HS256 => {
            hmac_tag::<Hmac<Sha256>>(validate::secret_key(key, algorithm)?, signing_input)
        }
        Algorithm::HS384 => {
            hmac_tag::<Hmac<Sha384>>(validate::secret_key(key, algorithm)?, signing_input)
        }
        Algorithm::HS512 => {
            hmac_tag::<Hmac<Sha512>>(validate::secret_key(key, algorithm)?, signing_input)
        }
        Algorithm::RS256 => rsa_sign(
            validate::rsa_signing_key(key, algorithm)?,
            Pkcs1v15Sign::new::<Sha256>(),
            &Sha256::digest(signing_input),
        ),
        Algorithm::RS384 => rsa_sign(
            validate::rsa_signing_key(key, algorithm)?,
            Pkcs1v15Sign::new::<Sha384>(),
            &Sha384::digest(signing_input),
        ),
        Algorithm::RS512 => rsa_sign(
            validate::rsa_signing_key(key, algorithm)?,
            Pkcs1v15Sign::new::<Sha512>(),
            &Sha512::digest(signing_input),
        ),
        Algorithm::ES256 => ecdsa_sign(validate::p256_signing_key(key, algorithm)?, signing_input),
        Algorithm::ES384 => ecdsa_sign(validate::p384_signing_key(key, algorithm)?, signing_input),
        Algorithm::ES512 => ecdsa_sign(validate::p521_signing_key(key, algorithm)?, signing_input),
        Algorithm::PS256 => pss_sign(
            validate::rsa_signing_key(key, algorithm)?,
            Pss::new::<Sha256>(),
            &Sha256::digest(signing_input),
        ),
        Algorithm::PS384 => pss_sign(
            validate::rsa_signing_key(key, algorithm)?,
            Pss::new::<Sha384>(),
            &Sha384::digest(signing_input),
        ),
        Algorithm::PS512 => pss_sign(
            validate::rsa_signing_key(key, algorithm)?,
            Pss::new::<Sha512>(),
            &Sha512::digest(signing_input),
        ),
    }
}

pub(crate) fn hmac_tag<M: Mac + KeyInit>(secret: &[u8], signing_input: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret)?;
    mac.update(signing_input);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn rsa_sign(
    key: &RsaPrivateKey,
    padding: impl SignatureScheme,
    digest: &[u8],
) -> Result<Vec<u8>> {
    Ok(key.sign(padding, digest)?)
}

// PSS is randomized: a fresh salt of the digest length is drawn per
// signature, so signing the same input twice yields different bytes.
fn pss_sign(key: &RsaPrivateKey, padding: Pss, digest: &[u8]) -> Result<Vec<u8>> {
    Ok(key.sign_with_rng(&mut rand::thread_rng(), padding, digest)?)
}

fn ecdsa_sign<C>(key: &impl Signer<Signature<C>>, signing_input: &[u8]) -> Result<Vec<u8>>
where
    C: PrimeCurve,
    SignatureSize<C>: ArrayLength<u8>,
{
    let signature: Signature<_> = key.try_sign(signing_input)?;
    Ok(signature.to_bytes().to_vec())
}
