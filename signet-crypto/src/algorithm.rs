use std::fmt;

use serde::{Deserialize, Serialize};

/// JSON Web Signature algorithm identifiers, as registered for the `alg`
/// header parameter (RFC 7518, section 3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    // HMAC with SHA-2
    HS256,
    HS384,
    HS512,
    // RSASSA-PKCS1-v1_5 with SHA-2
    RS256,
    RS384,
    RS512,
    // ECDSA with SHA-2
    ES256,
    ES384,
    ES512,
    // RSASSA-PSS with SHA-2, salt length matching the digest length
    PS256,
    PS384,
    PS512,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    Hmac,
    Rsa,
    RsaPss,
    Ecdsa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    #[serde(rename = "P-256")]
    P256,
    #[serde(rename = "P-384")]
    P384,
    #[serde(rename = "P-521")]
    P521,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

/// Requirements a key must satisfy before it may be used with an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyConstraint {
    /// Symmetric secret with a minimum length in bytes.
    Secret { min_bytes: usize },
    /// RSA key pair with a minimum modulus size in bits.
    Rsa { min_modulus_bits: usize },
    /// EC key pair on a specific curve, producing fixed-size `r || s`
    /// signatures.
    Ec { curve: Curve, signature_bytes: usize },
}

/// Per-algorithm parameters: the cryptographic family, the digest it is
/// paired with, and the constraints its keys must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmParams {
    pub family: AlgorithmFamily,
    pub digest: DigestAlgorithm,
    pub key: KeyConstraint,
}

impl AlgorithmParams {
    const fn hmac(digest: DigestAlgorithm, min_bytes: usize) -> Self {
        Self {
            family: AlgorithmFamily::Hmac,
            digest,
            key: KeyConstraint::Secret { min_bytes },
        }
    }
    const fn rsa(family: AlgorithmFamily, digest: DigestAlgorithm) -> Self {
        Self {
            family,
            digest,
            key: KeyConstraint::Rsa {
                min_modulus_bits: 2048,
            },
        }
    }
    const fn ecdsa(digest: DigestAlgorithm, curve: Curve, signature_bytes: usize) -> Self {
        Self {
            family: AlgorithmFamily::Ecdsa,
            digest,
            key: KeyConstraint::Ec {
                curve,
                signature_bytes,
            },
        }
    }
    pub fn min_secret_bytes(&self) -> Option<usize> {
        match self.key {
            KeyConstraint::Secret { min_bytes } => Some(min_bytes),
            _ => None,
        }
    }
    pub fn min_modulus_bits(&self) -> Option<usize> {
        match self.key {
            KeyConstraint::Rsa { min_modulus_bits } => Some(min_modulus_bits),
            _ => None,
        }
    }
    pub fn curve(&self) -> Option<Curve> {
        match self.key {
            KeyConstraint::Ec { curve, .. } => Some(curve),
            _ => None,
        }
    }
    pub fn signature_bytes(&self) -> Option<usize> {
        match self.key {
            KeyConstraint::Ec {
                signature_bytes, ..
            } => Some(signature_bytes),
            _ => None,
        }
    }
}

static PARAMS: [AlgorithmParams; 12] = [
    AlgorithmParams::hmac(DigestAlgorithm::Sha256, 32),
    AlgorithmParams::hmac(DigestAlgorithm::Sha384, 48),
    AlgorithmParams::hmac(DigestAlgorithm::Sha512, 64),
    AlgorithmParams::rsa(AlgorithmFamily::Rsa, DigestAlgorithm::Sha256),
    AlgorithmParams::rsa(AlgorithmFamily::Rsa, DigestAlgorithm::Sha384),
    AlgorithmParams::rsa(AlgorithmFamily::Rsa, DigestAlgorithm::Sha512),
    AlgorithmParams::ecdsa(DigestAlgorithm::Sha256, Curve::P256, 64),
    AlgorithmParams::ecdsa(DigestAlgorithm::Sha384, Curve::P384, 96),
    AlgorithmParams::ecdsa(DigestAlgorithm::Sha512, Curve::P521, 132),
    AlgorithmParams::rsa(AlgorithmFamily::RsaPss, DigestAlgorithm::Sha256),
    AlgorithmParams::rsa(AlgorithmFamily::RsaPss, DigestAlgorithm::Sha384),
    AlgorithmParams::rsa(AlgorithmFamily::RsaPss, DigestAlgorithm::Sha512),
];

impl Algorithm {
    /// Every supported algorithm, in registry order.
    pub const ALL: [Self; 12] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
        Self::PS256,
        Self::PS384,
        Self::PS512,
    ];

    /// Looks up an algorithm by its registered identifier. Identifiers are
    /// case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HS256" => Some(Self::HS256),
            "HS384" => Some(Self::HS384),
            "HS512" => Some(Self::HS512),
            "RS256" => Some(Self::RS256),
            "RS384" => Some(Self::RS384),
            "RS512" => Some(Self::RS512),
            "ES256" => Some(Self::ES256),
            "ES384" => Some(Self::ES384),
            "ES512" => Some(Self::ES512),
            "PS256" => Some(Self::PS256),
            "PS384" => Some(Self::PS384),
            "PS512" => Some(Self::PS512),
            _ => None,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
        }
    }
    pub fn params(&self) -> &'static AlgorithmParams {
        &PARAMS[*self as usize]
    }
    pub fn family(&self) -> AlgorithmFamily {
        self.params().family
    }
    pub fn digest(&self) -> DigestAlgorithm {
        self.params().digest
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Curve {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DigestAlgorithm {
    /// Digest output length in bytes. Also the salt length used by the
    /// RSASSA-PSS algorithms.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::parse(algorithm.as_str()), Some(algorithm));
            assert_eq!(algorithm.to_string(), algorithm.as_str());
        }
        assert_eq!(Algorithm::parse("HS257"), None);
        assert_eq!(Algorithm::parse("hs256"), None);
        assert_eq!(Algorithm::parse(""), None);
    }

    #[test]
    fn hmac_params() {
        let cases = [
            (Algorithm::HS256, DigestAlgorithm::Sha256, 32),
            (Algorithm::HS384, DigestAlgorithm::Sha384, 48),
            (Algorithm::HS512, DigestAlgorithm::Sha512, 64),
        ];
        for (algorithm, digest, min_bytes) in cases {
            let params = algorithm.params();
            assert_eq!(params.family, AlgorithmFamily::Hmac);
            assert_eq!(params.digest, digest);
            assert_eq!(params.min_secret_bytes(), Some(min_bytes));
            assert_eq!(params.signature_bytes(), None);
        }
    }

    #[test]
    fn rsa_params() {
        let cases = [
            (Algorithm::RS256, AlgorithmFamily::Rsa, DigestAlgorithm::Sha256),
            (Algorithm::RS384, AlgorithmFamily::Rsa, DigestAlgorithm::Sha384),
            (Algorithm::RS512, AlgorithmFamily::Rsa, DigestAlgorithm::Sha512),
            (Algorithm::PS256, AlgorithmFamily::RsaPss, DigestAlgorithm::Sha256),
            (Algorithm::PS384, AlgorithmFamily::RsaPss, DigestAlgorithm::Sha384),
            (Algorithm::PS512, AlgorithmFamily::RsaPss, DigestAlgorithm::Sha512),
        ];
        for (algorithm, family, digest) in cases {
            let params = algorithm.params();
            assert_eq!(params.family, family);
            assert_eq!(params.digest, digest);
            assert_eq!(params.min_modulus_bits(), Some(2048));
            assert_eq!(params.curve(), None);
        }
    }

    #[test]
    fn ecdsa_params() {
        let cases = [
            (Algorithm::ES256, DigestAlgorithm::Sha256, Curve::P256, 64),
            (Algorithm::ES384, DigestAlgorithm::Sha384, Curve::P384, 96),
            (Algorithm::ES512, DigestAlgorithm::Sha512, Curve::P521, 132),
        ];
        for (algorithm, digest, curve, signature_bytes) in cases {
            let params = algorithm.params();
            assert_eq!(params.family, AlgorithmFamily::Ecdsa);
            assert_eq!(params.digest, digest);
            assert_eq!(params.curve(), Some(curve));
            assert_eq!(params.signature_bytes(), Some(signature_bytes));
        }
    }

    #[test]
    fn digest_output_lengths() {
        assert_eq!(DigestAlgorithm::Sha256.output_len(), 32);
        assert_eq!(DigestAlgorithm::Sha384.output_len(), 48);
        assert_eq!(DigestAlgorithm::Sha512.output_len(), 64);
    }

    #[test]
    fn serde_uses_registered_names() {
        assert_eq!(
            serde_json::to_string(&Algorithm::ES256).expect("serialization should succeed"),
            r#""ES256""#
        );
        assert_eq!(
            serde_json::from_str::<Algorithm>(r#""PS512""#).expect("deserialization should succeed"),
            Algorithm::PS512
        );
        assert_eq!(
            serde_json::to_string(&Curve::P521).expect("serialization should succeed"),
            r#""P-521""#
        );
        assert!(serde_json::from_str::<Algorithm>(r#""none""#).is_err());
    }
}
