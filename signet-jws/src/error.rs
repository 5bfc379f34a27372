use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Invalid JWS: {0}")]
    InvalidFormat(&'static str),
    #[error("Invalid protected header: {0}")]
    InvalidProtectedHeader(&'static str),
    #[error("Invalid unprotected header: {0}")]
    InvalidUnprotectedHeader(&'static str),
    #[error(r#"Invalid "{param}" header parameter: {reason}"#)]
    HeaderParamInvalid {
        param: &'static str,
        reason: String,
    },
    #[error("Header parameter names must be disjoint between protected and unprotected headers")]
    HeaderParametersNotDisjoint,
    #[error("Either a protected or an unprotected header must be present")]
    MissingHeaders,
    #[error("Signature must be valid base64url-encoded data")]
    InvalidSignatureEncoding,
    #[error("Payload must be valid base64url-encoded data")]
    InvalidPayload,
    #[error("Signature verification failed")]
    InvalidSignature,
    #[error(transparent)]
    Key(#[from] signet_crypto::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
