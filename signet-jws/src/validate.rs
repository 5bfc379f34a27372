use std::collections::HashSet;

use serde_json::Value;
use signet_crypto::{Algorithm, AlgorithmFamily};
use url::Url;

use crate::error::{Error, Result};
use crate::header::{is_disjoint, HeaderMap, JoseHeader, REGISTERED_HEADER_PARAMETERS};

/// JWK parameters that carry private or symmetric key material
/// (RFC 7518, sections 6.2.2, 6.3.2 and 6.4). A JOSE header must never
/// contain any of them.
const PRIVATE_KEY_PARAMETERS: [&str; 8] = ["d", "p", "q", "dp", "dq", "qi", "k", "oth"];

const ALLOWED_JWK_CURVES: [&str; 3] = ["P-256", "P-384", "P-521"];

/// Validates the two JOSE header partitions of a signature and returns
/// the effective header.
///
/// At least one partition must be present and their parameter names must
/// be disjoint. The registered parameters `alg`, `jku`, `jwk`, `kid`,
/// `typ`, `cty` and `crit` are checked against their RFC 7515 rules;
/// unregistered parameters pass through untouched. When
/// `allowed_algorithms` is given, `alg` must also be a member of it.
pub fn validate_jose_header(
    protected: Option<&HeaderMap>,
    unprotected: Option<&HeaderMap>,
    allowed_algorithms: Option<&[Algorithm]>,
) -> Result<JoseHeader> {
    if protected.is_none() && unprotected.is_none() {
        return Err(Error::MissingHeaders);
    }
    if !is_disjoint(protected, unprotected) {
        return Err(Error::HeaderParametersNotDisjoint);
    }
    let mut merged = HeaderMap::new();
    if let Some(unprotected) = unprotected {
        merged.extend(unprotected.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    if let Some(protected) = protected {
        merged.extend(protected.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let algorithm = validate_alg(&merged, allowed_algorithms)?;
    validate_jku(&merged)?;
    validate_jwk(&merged, algorithm)?;
    validate_kid(&merged)?;
    validate_typ(&merged)?;
    validate_cty(&merged)?;
    validate_crit(protected, unprotected, &merged)?;
    Ok(JoseHeader::new(algorithm, merged))
}

fn invalid_param(param: &'static str, reason: impl Into<String>) -> Error {
    Error::HeaderParamInvalid {
        param,
        reason: reason.into(),
    }
}

fn validate_alg(header: &HeaderMap, allowed: Option<&[Algorithm]>) -> Result<Algorithm> {
    let Some(value) = header.get("alg") else {
        return Err(invalid_param("alg", "is required"));
    };
    let algorithm = match value.as_str() {
        Some(s) => Algorithm::parse(s).ok_or_else(|| Error::UnsupportedAlgorithm(s.to_owned()))?,
        None => return Err(Error::UnsupportedAlgorithm(value.to_string())),
    };
    if let Some(allowed) = allowed {
        if !allowed.contains(&algorithm) {
            return Err(Error::UnsupportedAlgorithm(algorithm.to_string()));
        }
    }
    Ok(algorithm)
}

fn validate_jku(header: &HeaderMap) -> Result<()> {
    let Some(value) = header.get("jku") else {
        return Ok(());
    };
    let Some(jku) = value.as_str() else {
        return Err(invalid_param("jku", "must be a string"));
    };
    let url = Url::parse(jku).map_err(|_| invalid_param("jku", "must be a valid URL"))?;
    if url.scheme() != "https" {
        return Err(invalid_param("jku", "must use the https scheme"));
    }
    if url.fragment().is_some() {
        return Err(invalid_param("jku", "must not contain a fragment"));
    }
    if url.query().is_some() {
        return Err(invalid_param("jku", "must not contain query parameters"));
    }
    Ok(())
}

fn validate_jwk(header: &HeaderMap, algorithm: Algorithm) -> Result<()> {
    let Some(value) = header.get("jwk") else {
        return Ok(());
    };
    if algorithm.family() == AlgorithmFamily::Hmac {
        return Err(invalid_param(
            "jwk",
            format!("must not be present for {algorithm}"),
        ));
    }
    let Some(jwk) = value.as_object() else {
        return Err(invalid_param("jwk", "must be a JSON object"));
    };
    let Some(kty) = jwk.get("kty").and_then(Value::as_str) else {
        return Err(invalid_param(
            "jwk",
            r#"must contain a "kty" (key type) parameter"#,
        ));
    };
    if !matches!(kty, "RSA" | "EC") {
        return Err(invalid_param("jwk", "key type must be one of: RSA, EC"));
    }
    let expected_kty = match algorithm.family() {
        AlgorithmFamily::Ecdsa => "EC",
        _ => "RSA",
    };
    if kty != expected_kty {
        return Err(invalid_param(
            "jwk",
            format!(r#"key type "{kty}" cannot be used with {algorithm}"#),
        ));
    }
    if kty == "EC" {
        validate_ec_jwk(jwk)?;
    } else {
        validate_rsa_jwk(jwk)?;
    }
    let private: Vec<&str> = PRIVATE_KEY_PARAMETERS
        .iter()
        .copied()
        .filter(|name| jwk.contains_key(*name))
        .collect();
    if !private.is_empty() {
        return Err(invalid_param(
            "jwk",
            format!(
                "must not contain private key parameters: {}",
                private.join(", ")
            ),
        ));
    }
    Ok(())
}

fn validate_ec_jwk(jwk: &HeaderMap) -> Result<()> {
    let Some(crv) = jwk.get("crv").and_then(Value::as_str) else {
        return Err(invalid_param(
            "jwk",
            r#"an EC key must contain a "crv" (curve) parameter"#,
        ));
    };
    if !ALLOWED_JWK_CURVES.contains(&crv) {
        return Err(invalid_param("jwk", format!(r#"unsupported curve "{crv}""#)));
    }
    if jwk.get("x").and_then(Value::as_str).is_none() {
        return Err(invalid_param(
            "jwk",
            r#"an EC key must contain an "x" coordinate"#,
        ));
    }
    if jwk.get("y").and_then(Value::as_str).is_none() {
        return Err(invalid_param(
            "jwk",
            r#"an EC key must contain a "y" coordinate"#,
        ));
    }
    Ok(())
}

fn validate_rsa_jwk(jwk: &HeaderMap) -> Result<()> {
    if jwk.get("n").and_then(Value::as_str).is_none() {
        return Err(invalid_param(
            "jwk",
            r#"an RSA key must contain an "n" (modulus) parameter"#,
        ));
    }
    if jwk.get("e").and_then(Value::as_str).is_none() {
        return Err(invalid_param(
            "jwk",
            r#"an RSA key must contain an "e" (exponent) parameter"#,
        ));
    }
    Ok(())
}

fn validate_kid(header: &HeaderMap) -> Result<()> {
    let Some(value) = header.get("kid") else {
        return Ok(());
    };
    let Some(kid) = value.as_str() else {
        return Err(invalid_param("kid", "must be a string"));
    };
    if kid.trim().is_empty() {
        return Err(invalid_param("kid", "must not be blank"));
    }
    Ok(())
}

fn validate_typ(header: &HeaderMap) -> Result<()> {
    match header.get("typ") {
        None => Ok(()),
        Some(value) if value.is_string() => Ok(()),
        Some(_) => Err(invalid_param("typ", "must be a string")),
    }
}

fn validate_cty(header: &HeaderMap) -> Result<()> {
    match header.get("cty") {
        None => Ok(()),
        Some(value) if value.is_string() => Ok(()),
        Some(_) => Err(invalid_param("cty", "must be a string")),
    }
}

fn validate_crit(
    protected: Option<&HeaderMap>,
    unprotected: Option<&HeaderMap>,
    merged: &HeaderMap,
) -> Result<()> {
    if unprotected.is_some_and(|header| header.contains_key("crit")) {
        return Err(invalid_param(
            "crit",
            "must not be present in the unprotected header",
        ));
    }
    let Some(value) = protected.and_then(|header| header.get("crit")) else {
        return Ok(());
    };
    let Some(entries) = value.as_array() else {
        return Err(invalid_param("crit", "must be an array of non-empty strings"));
    };
    if entries.is_empty() {
        return Err(invalid_param("crit", "must not be empty"));
    }
    let mut names = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str() {
            Some(name) if !name.is_empty() => names.push(name),
            _ => return Err(invalid_param("crit", "must contain only non-empty strings")),
        }
    }
    let registered: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| REGISTERED_HEADER_PARAMETERS.contains(name))
        .collect();
    if !registered.is_empty() {
        return Err(invalid_param(
            "crit",
            format!(
                "must not list registered header parameter names: {}",
                registered.join(", ")
            ),
        ));
    }
    let unique: HashSet<&str> = names.iter().copied().collect();
    if unique.len() != names.len() {
        return Err(invalid_param("crit", "must not contain duplicate names"));
    }
    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !merged.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(invalid_param(
            "crit",
            format!(
                "references parameters that are not present in the header: {}",
                missing.join(", ")
            ),
        ));
    }
    Ok(())
}
