#![doc = include_str!("../README.md")]
mod algorithm;
pub mod error;
mod key;
mod sign;
mod validate;
mod verify;

pub use algorithm::{Algorithm, AlgorithmFamily, AlgorithmParams, Curve, DigestAlgorithm, KeyConstraint};
pub use error::{Error, Result};
pub use key::{Key, KeyFamily, KeyKind, KeyUsage};
pub use sign::sign;
pub use validate::validate_key;
pub use verify::verify;
