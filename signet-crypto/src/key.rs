use std::fmt;

use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::algorithm::Curve;

/// Whether a key is used to produce or to check signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsage {
    Sign,
    Verify,
}

/// The broad kind of key material: a symmetric secret, or the private or
/// public half of an asymmetric key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Secret,
    Private,
    Public,
}

impl KeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secret => "secret",
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The asymmetric family a key was created for. RSA keys declare whether
/// they are intended for PKCS#1 v1.5 or PSS signatures, mirroring the
/// `rsa` / `rsa-pss` key type split in other JOSE stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Rsa,
    RsaPss,
    Ec,
}

impl KeyFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::RsaPss => "rsa-pss",
            Self::Ec => "ec",
        }
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) enum Inner {
    Secret(Vec<u8>),
    RsaPrivate(KeyFamily, Box<RsaPrivateKey>),
    RsaPublic(KeyFamily, Box<RsaPublicKey>),
    P256Private(Box<p256::ecdsa::SigningKey>),
    P256Public(Box<p256::ecdsa::VerifyingKey>),
    P384Private(Box<p384::ecdsa::SigningKey>),
    P384Public(Box<p384::ecdsa::VerifyingKey>),
    P521Private(Box<p521::ecdsa::SigningKey>),
    P521Public(Box<p521::ecdsa::VerifyingKey>),
}

/// Key material accepted by [`sign`](crate::sign) and
/// [`verify`](crate::verify).
///
/// A `Key` wraps one concrete piece of key material. Whether it fits a
/// given algorithm is checked by [`validate_key`](crate::validate_key) and
/// by the signing and verification entry points themselves.
pub struct Key {
    pub(crate) inner: Inner,
}

impl Key {
    /// Wraps a symmetric secret for the HMAC algorithms.
    pub fn secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Inner::Secret(secret.into()),
        }
    }
    /// Wraps an RSA private key for the RSASSA-PKCS1-v1_5 algorithms.
    pub fn rsa_private(key: RsaPrivateKey) -> Self {
        Self {
            inner: Inner::RsaPrivate(KeyFamily::Rsa, Box::new(key)),
        }
    }
    /// Wraps an RSA public key for the RSASSA-PKCS1-v1_5 algorithms.
    pub fn rsa_public(key: RsaPublicKey) -> Self {
        Self {
            inner: Inner::RsaPublic(KeyFamily::Rsa, Box::new(key)),
        }
    }
    /// Wraps an RSA private key for the RSASSA-PSS algorithms.
    pub fn rsa_pss_private(key: RsaPrivateKey) -> Self {
        Self {
            inner: Inner::RsaPrivate(KeyFamily::RsaPss, Box::new(key)),
        }
    }
    /// Wraps an RSA public key for the RSASSA-PSS algorithms.
    pub fn rsa_pss_public(key: RsaPublicKey) -> Self {
        Self {
            inner: Inner::RsaPublic(KeyFamily::RsaPss, Box::new(key)),
        }
    }
    /// Wraps a P-256 private key for ES256.
    pub fn p256_private(key: p256::ecdsa::SigningKey) -> Self {
        Self {
            inner: Inner::P256Private(Box::new(key)),
        }
    }
    /// Wraps a P-256 public key for ES256.
    pub fn p256_public(key: p256::ecdsa::VerifyingKey) -> Self {
        Self {
            inner: Inner::P256Public(Box::new(key)),
        }
    }
    /// Wraps a P-384 private key for ES384.
    pub fn p384_private(key: p384::ecdsa::SigningKey) -> Self {
        Self {
            inner: Inner::P384Private(Box::new(key)),
        }
    }
    /// Wraps a P-384 public key for ES384.
    pub fn p384_public(key: p384::ecdsa::VerifyingKey) -> Self {
        Self {
            inner: Inner::P384Public(Box::new(key)),
        }
    }
    /// Wraps a P-521 private key for ES512.
    pub fn p521_private(key: p521::ecdsa::SigningKey) -> Self {
        Self {
            inner: Inner::P521Private(Box::new(key)),
        }
    }
    /// Wraps a P-521 public key for ES512.
    pub fn p521_public(key: p521::ecdsa::VerifyingKey) -> Self {
        Self {
            inner: Inner::P521Public(Box::new(key)),
        }
    }
    pub fn kind(&self) -> KeyKind {
        match &self.inner {
            Inner::Secret(_) => KeyKind::Secret,
            Inner::RsaPrivate(..)
            | Inner::P256Private(_)
            | Inner::P384Private(_)
            | Inner::P521Private(_) => KeyKind::Private,
            Inner::RsaPublic(..)
            | Inner::P256Public(_)
            | Inner::P384Public(_)
            | Inner::P521Public(_) => KeyKind::Public,
        }
    }
    /// The asymmetric family this key belongs to, or `None` for secrets.
    pub fn family(&self) -> Option<KeyFamily> {
        match &self.inner {
            Inner::Secret(_) => None,
            Inner::RsaPrivate(family, _) | Inner::RsaPublic(family, _) => Some(*family),
            _ => Some(KeyFamily::Ec),
        }
    }
    /// The curve of an EC key, or `None` for other keys.
    pub fn curve(&self) -> Option<Curve> {
        match &self.inner {
            Inner::P256Private(_) | Inner::P256Public(_) => Some(Curve::P256),
            Inner::P384Private(_) | Inner::P384Public(_) => Some(Curve::P384),
            Inner::P521Private(_) | Inner::P521Public(_) => Some(Curve::P521),
            _ => None,
        }
    }
    /// The length in bytes of a symmetric secret, or `None` for other keys.
    pub fn secret_len(&self) -> Option<usize> {
        match &self.inner {
            Inner::Secret(secret) => Some(secret.len()),
            _ => None,
        }
    }
    /// The modulus size in bits of an RSA key, or `None` for other keys.
    pub fn modulus_bits(&self) -> Option<usize> {
        match &self.inner {
            Inner::RsaPrivate(_, key) => Some(key.n().bits()),
            Inner::RsaPublic(_, key) => Some(key.n().bits()),
            _ => None,
        }
    }
}

// Key material must not leak through Debug output.
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
