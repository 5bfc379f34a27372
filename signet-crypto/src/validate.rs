use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::algorithm::{Algorithm, AlgorithmFamily, Curve};
use crate::error::{Error, Result};
use crate::key::{Inner, Key, KeyFamily, KeyKind, KeyUsage};

/// Checks that `key` is usable with `algorithm` for the given usage,
/// without performing any cryptographic operation.
///
/// The same checks run inside [`sign`](crate::sign) and
/// [`verify`](crate::verify); this entry point exists for callers that
/// want to reject a key up front.
pub fn validate_key(key: &Key, algorithm: Algorithm, usage: KeyUsage) -> Result<()> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            secret_key(key, algorithm)?;
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => match usage {
            KeyUsage::Sign => {
                rsa_signing_key(key, algorithm)?;
            }
            KeyUsage::Verify => {
                rsa_verifying_key(key, algorithm)?;
            }
        },
        Algorithm::ES256 => match usage {
            KeyUsage::Sign => {
                p256_signing_key(key, algorithm)?;
            }
            KeyUsage::Verify => {
                p256_verifying_key(key, algorithm)?;
            }
        },
        Algorithm::ES384 => match usage {
            KeyUsage::Sign => {
                p384_signing_key(key, algorithm)?;
            }
            KeyUsage::Verify => {
                p384_verifying_key(key, algorithm)?;
            }
        },
        Algorithm::ES512 => match usage {
            KeyUsage::Sign => {
                p521_signing_key(key, algorithm)?;
            }
            KeyUsage::Verify => {
                p521_verifying_key(key, algorithm)?;
            }
        },
    }
    Ok(())
}

pub(crate) fn secret_key<'a>(key: &'a Key, algorithm: Algorithm) -> Result<&'a [u8]> {
    let Inner::Secret(secret) = &key.inner else {
        return Err(Error::InvalidKeyType {
            algorithm,
            expected: KeyKind::Secret,
        });
    };
    let minimum = algorithm.params().min_secret_bytes().unwrap_or(0);
    if secret.len() < minimum {
        return Err(Error::InvalidKeySize { algorithm, minimum });
    }
    Ok(secret)
}

fn rsa_family(algorithm: Algorithm) -> KeyFamily {
    match algorithm.family() {
        AlgorithmFamily::RsaPss => KeyFamily::RsaPss,
        _ => KeyFamily::Rsa,
    }
}

fn check_modulus(algorithm: Algorithm, key: &impl PublicKeyParts) -> Result<()> {
    let Some(min_bits) = algorithm.params().min_modulus_bits() else {
        return Ok(());
    };
    if key.n().bits() < min_bits {
        return Err(Error::InvalidKeySize {
            algorithm,
            minimum: min_bits / 8,
        });
    }
    Ok(())
}

pub(crate) fn rsa_signing_key<'a>(key: &'a Key, algorithm: Algorithm) -> Result<&'a RsaPrivateKey> {
    let expected = rsa_family(algorithm);
    match &key.inner {
        Inner::RsaPrivate(family, rsa_key) => {
            if *family != expected {
                return Err(Error::InvalidAsymmetricKeyType {
                    algorithm,
                    expected,
                });
            }
            check_modulus(algorithm, &**rsa_key)?;
            Ok(rsa_key)
        }
        Inner::P256Private(_) | Inner::P384Private(_) | Inner::P521Private(_) => {
            Err(Error::InvalidAsymmetricKeyType {
                algorithm,
                expected,
            })
        }
        _ => Err(Error::InvalidKeyType {
            algorithm,
            expected: KeyKind::Private,
        }),
    }
}

pub(crate) fn rsa_verifying_key<'a>(key: &'a Key, algorithm: Algorithm) -> Result<&'a RsaPublicKey> {
    let expected = rsa_family(algorithm);
    match &key.inner {
        Inner::RsaPublic(family, rsa_key) => {
            if *family != expected {
                return Err(Error::InvalidAsymmetricKeyType {
                    algorithm,
                    expected,
                });
            }
            check_modulus(algorithm, &**rsa_key)?;
            Ok(rsa_key)
        }
        Inner::P256Public(_) | Inner::P384Public(_) | Inner::P521Public(_) => {
            Err(Error::InvalidAsymmetricKeyType {
                algorithm,
                expected,
            })
        }
        _ => Err(Error::InvalidKeyType {
            algorithm,
            expected: KeyKind::Public,
        }),
    }
}

pub(crate) fn p256_signing_key<'a>(
    key: &'a Key,
    algorithm: Algorithm,
) -> Result<&'a p256::ecdsa::SigningKey> {
    match &key.inner {
        Inner::P256Private(signing_key) => Ok(signing_key),
        Inner::P384Private(_) | Inner::P521Private(_) => Err(Error::InvalidCurve {
            algorithm,
            expected: Curve::P256,
        }),
        Inner::RsaPrivate(..) => Err(Error::InvalidAsymmetricKeyType {
            algorithm,
            expected: KeyFamily::Ec,
        }),
        _ => Err(Error::InvalidKeyType {
            algorithm,
            expected: KeyKind::Private,
        }),
    }
}

pub(crate) fn p256_verifying_key<'a>(
    key: &'a Key,
    algorithm: Algorithm,
) -> Result<&'a p256::ecdsa::VerifyingKey> {
    match &key.inner {
        Inner::P256Public(verifying_key) => Ok(verifying_key),
        Inner::P384Public(_) | Inner::P521Public(_) => Err(Error::InvalidCurve {
            algorithm,
            expected: Curve::P256,
        }),
        Inner::RsaPublic(..) => Err(Error::InvalidAsymmetricKeyType {
            algorithm,
            expected: KeyFamily::Ec,
        }),
        _ => Err(Error::InvalidKeyType {
            algorithm,
            expected: KeyKind::Public,
        }),
    }
}

pub(crate) fn p384_signing_key<'a>(
    key: &'a Key,
    algorithm: Algorithm,
) -> Result<&'a p384::ecdsa::SigningKey> {
    match &key.inner {
        Inner::P384Private(signing_key) => Ok(signing_key),
        Inner::P256Private(_) | Inner::P521Private(_) => Err(Error::InvalidCurve {
            algorithm,
            expected: Curve::P384,
        }),
        Inner::RsaPrivate(..) => Err(Error::InvalidAsymmetricKeyType {
            algorithm,
            expected: KeyFamily::Ec,
        }),
        _ => Err(Error::InvalidKeyType {
            algorithm,
            expected: KeyKind::Private,
        }),
    }
}

pub(crate) fn p384_verifying_key<'a>(
    key: &'a Key,
    algorithm: Algorithm,
) -> Result<&'a p384::ecdsa::VerifyingKey> {
    match &key.inner {
        Inner::P384Public(verifying_key) => Ok(verifying_key),
        Inner::P256Public(_) | Inner::P521Public(_) => Err(Error::InvalidCurve {
            algorithm,
            expected: Curve::P384,
        }),
        Inner::RsaPublic(..) => Err(Error::InvalidAsymmetricKeyType {
            algorithm,
            expected: KeyFamily::Ec,
        }),
        _ => Err(Error::InvalidKeyType {
            algorithm,
            expected: KeyKind::Public,
        }),
    }
}

pub(crate) fn p521_signing_key<'a>(
    key: &'a Key,
    algorithm: Algorithm,
) -> Result<&'a p521::ecdsa::SigningKey> {
    match &key.inner {
        Inner::P521Private(signing_key) => Ok(signing_key),
        Inner::P256Private(_) | Inner::P384Private(_) => Err(Error::InvalidCurve {
            algorithm,
            expected: Curve::P521,
        }),
        Inner::RsaPrivate(..) => Err(Error::InvalidAsymmetricKeyType {
            algorithm,
            expected: KeyFamily::Ec,
        }),
        _ => Err(Error::InvalidKeyType {
            algorithm,
            expected: KeyKind::Private,
        }),
    }
}

pub(crate) fn p521_verifying_key<'a>(
    key: &'a Key,
    algorithm: Algorithm,
) -> Result<&'a p521::ecdsa::VerifyingKey> {
    match &key.inner {
        Inner::P521Public(verifying_key) => Ok(verifying_key),
        Inner::P256Public(_) | Inner::P384Public(_) => Err(Error::InvalidCurve {
            algorithm,
            expected: Curve::P521,
        }),
        Inner::RsaPublic(..) => Err(Error::InvalidAsymmetricKeyType {
            algorithm,
            expected: KeyFamily::Ec,
        }),
        _ => Err(Error::InvalidKeyType {
            algorithm,
            expected: KeyKind::Public,
        }),
    }
}
