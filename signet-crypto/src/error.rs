use thiserror::Error;

use crate::algorithm::{Algorithm, Curve};
use crate::key::{KeyFamily, KeyKind};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid key type for {algorithm}: expected a {expected} key")]
    InvalidKeyType {
        algorithm: Algorithm,
        expected: KeyKind,
    },
    #[error("Invalid key size for {algorithm}: the key must be at least {minimum} bytes")]
    InvalidKeySize {
        algorithm: Algorithm,
        minimum: usize,
    },
    #[error("Invalid asymmetric key type for {algorithm}: expected a key of type {expected}")]
    InvalidAsymmetricKeyType {
        algorithm: Algorithm,
        expected: KeyFamily,
    },
    #[error("Invalid curve for {algorithm}: expected {expected}")]
    InvalidCurve {
        algorithm: Algorithm,
        expected: Curve,
    },
    #[error("Invalid signature length for {algorithm}: expected {expected} bytes")]
    InvalidSignatureLength {
        algorithm: Algorithm,
        expected: usize,
    },
    #[error(transparent)]
    Hmac(#[from] hmac::digest::InvalidLength),
    #[error(transparent)]
    Rsa(#[from] rsa::Error),
    #[error(transparent)]
    Signature(#[from] ecdsa::signature::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
