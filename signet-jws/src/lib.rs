#![doc = include_str!("../README.md")]
pub mod base64url;
mod compact;
pub mod error;
mod flattened;
mod general;
mod header;
mod validate;

pub use compact::{create_compact, verify_compact};
pub use error::{Error, Result};
pub use flattened::{create_flattened, verify_flattened, FlattenedJws, VerifiedJws, VerifyOptions};
pub use general::{create_general, verify_general, GeneralJws, JwsSignature, SignatureEntry};
pub use header::{is_disjoint, HeaderMap, JoseHeader, REGISTERED_HEADER_PARAMETERS};
pub use validate::validate_jose_header;
