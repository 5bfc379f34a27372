use serde_json::Value;
use signet_crypto::Algorithm;

/// A JOSE header partition: arbitrary parameter names mapped to JSON
/// values.
pub type HeaderMap = serde_json::Map<String, Value>;

/// Header parameter names registered for JWS (RFC 7515, section 4.1).
/// These are the names the `crit` parameter may not list.
pub const REGISTERED_HEADER_PARAMETERS: [&str; 11] = [
    "alg",
    "jku",
    "jwk",
    "kid",
    "x5u",
    "x5c",
    "x5t",
    "x5t#S256",
    "typ",
    "cty",
    "crit",
];

/// Whether no parameter name occurs in both header partitions. Absent
/// partitions are disjoint with anything.
pub fn is_disjoint(protected: Option<&HeaderMap>, unprotected: Option<&HeaderMap>) -> bool {
    match (protected, unprotected) {
        (Some(protected), Some(unprotected)) => {
            protected.keys().all(|name| !unprotected.contains_key(name))
        }
        _ => true,
    }
}

/// The effective JOSE header of a signature: the union of the protected
/// and unprotected partitions, after validation.
///
/// Values of this type are only produced by
/// [`validate_jose_header`](crate::validate_jose_header), so holding one
/// means every registered parameter rule has passed and `algorithm` is
/// supported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoseHeader {
    algorithm: Algorithm,
    parameters: HeaderMap,
}

impl JoseHeader {
    pub(crate) fn new(algorithm: Algorithm, parameters: HeaderMap) -> Self {
        Self {
            algorithm,
            parameters,
        }
    }
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
    /// All parameters of the effective header, including `alg`.
    pub fn parameters(&self) -> &HeaderMap {
        &self.parameters
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn map(entries: &[(&str, &str)]) -> HeaderMap {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), Value::from(*value)))
            .collect()
    }

    #[test]
    fn absent_partitions_are_disjoint() {
        assert!(is_disjoint(None, None));
        assert!(is_disjoint(Some(&map(&[("alg", "HS256")])), None));
        assert!(is_disjoint(None, Some(&map(&[("kid", "key-1")]))));
    }

    #[test]
    fn shared_names_are_not_disjoint() {
        let protected = map(&[("alg", "HS256"), ("kid", "key-1")]);
        let unprotected = map(&[("kid", "key-2")]);
        assert!(!is_disjoint(Some(&protected), Some(&unprotected)));
        assert!(is_disjoint(
            Some(&protected),
            Some(&map(&[("typ", "JOSE+JSON")]))
        ));
        assert!(is_disjoint(Some(&map(&[])), Some(&map(&[]))));
    }

    #[test]
    fn disjointness_matches_the_union_cardinality_rule() {
        let partitions = [
            map(&[]),
            map(&[("alg", "HS256")]),
            map(&[("alg", "HS256"), ("kid", "key-1")]),
            map(&[("kid", "key-1"), ("cty", "text/plain")]),
            map(&[("typ", "JOSE")]),
        ];
        for protected in &partitions {
            for unprotected in &partitions {
                let union: HashSet<&String> =
                    protected.keys().chain(unprotected.keys()).collect();
                let expected = union.len() == protected.len() + unprotected.len();
                assert_eq!(is_disjoint(Some(protected), Some(unprotected)), expected);
            }
        }
    }
}
