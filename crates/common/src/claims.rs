//! Claim-access contract over validated access tokens.
//!
//! The policy layer never parses raw JWTs. An external validation layer
//! checks signature, issuer, audience and expiry, and hands over the parsed
//! claims; this module defines the stable shape of that hand-off.
//!
//! A token carries an unordered multiset of claims: the same claim type can
//! appear more than once (an access token with several application roles has
//! one `roles` claim per role). Lookups therefore return every value for a
//! type, not just the first.

use serde::{Deserialize, Serialize};

/// A single claim from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type, e.g. `roles`, `azp`, `appidacr`. Not unique within a token.
    #[serde(rename = "type")]
    pub claim_type: String,

    /// Claim value, carried as a string.
    pub value: String,
}

impl Claim {
    /// Create a claim from a type and value.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// The claim set of one validated token.
///
/// Immutable after construction; policy evaluation reads it and never
/// mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    claims: Vec<Claim>,
}

impl ClaimSet {
    /// Create a claim set from a list of claims.
    #[must_use]
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }

    /// Build a claim set from a parsed JWT payload.
    ///
    /// This adapts the output of the external validation layer: string
    /// values become one claim, arrays fan out into one claim per string
    /// element (how multi-valued claims like `roles` arrive on the wire),
    /// and numbers/booleans are carried as their string form. Nested
    /// objects and nulls carry no authorization signal and are skipped.
    #[must_use]
    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        use serde_json::Value;

        let mut claims = Vec::new();
        for (claim_type, value) in map {
            match value {
                Value::String(s) => claims.push(Claim::new(claim_type, s)),
                Value::Array(items) => {
                    for item in items {
                        match item {
                            Value::String(s) => claims.push(Claim::new(claim_type, s)),
                            Value::Number(n) => claims.push(Claim::new(claim_type, n.to_string())),
                            Value::Bool(b) => claims.push(Claim::new(claim_type, b.to_string())),
                            _ => {
                                tracing::debug!(
                                    target: "common.claims",
                                    claim_type = %claim_type,
                                    "Skipping non-scalar element in claim array"
                                );
                            }
                        }
                    }
                }
                Value::Number(n) => claims.push(Claim::new(claim_type, n.to_string())),
                Value::Bool(b) => claims.push(Claim::new(claim_type, b.to_string())),
                Value::Null | Value::Object(_) => {
                    tracing::debug!(
                        target: "common.claims",
                        claim_type = %claim_type,
                        "Skipping non-scalar claim value"
                    );
                }
            }
        }

        Self { claims }
    }

    /// All values carried by claims of the given type, possibly empty.
    ///
    /// This is the stable lookup contract the policy layer evaluates
    /// against.
    pub fn claims_by_type<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a str> {
        self.claims
            .iter()
            .filter(move |c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
    }

    /// Whether any claim of the given type equals `value` exactly.
    ///
    /// Comparison is case-sensitive.
    #[must_use]
    pub fn has_claim(&self, claim_type: &str, value: &str) -> bool {
        self.claims_by_type(claim_type).any(|v| v == value)
    }

    /// Iterate over all claims.
    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter()
    }

    /// Number of claims in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the set carries no claims at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl FromIterator<Claim> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        Self {
            claims: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample_set() -> ClaimSet {
        ClaimSet::new(vec![
            Claim::new("roles", "AppRole.CharityAccounts.Read.All"),
            Claim::new("roles", "AppRole.CharityAccounts.Write.All"),
            Claim::new("azp", "09c26636-5e0c-4ff6-b551-e24d489046c9"),
            Claim::new("azpacr", "2"),
        ])
    }

    #[test]
    fn test_claims_by_type_returns_all_values() {
        let claims = sample_set();

        let roles: Vec<&str> = claims.claims_by_type("roles").collect();
        assert_eq!(
            roles,
            vec![
                "AppRole.CharityAccounts.Read.All",
                "AppRole.CharityAccounts.Write.All"
            ]
        );
    }

    #[test]
    fn test_claims_by_type_missing_type_is_empty() {
        let claims = sample_set();
        assert_eq!(claims.claims_by_type("scp").count(), 0);
    }

    #[test]
    fn test_has_claim_exact_match() {
        let claims = sample_set();

        assert!(claims.has_claim("azpacr", "2"));
        assert!(!claims.has_claim("azpacr", "1"));
    }

    #[test]
    fn test_has_claim_is_case_sensitive() {
        let claims = sample_set();

        assert!(claims.has_claim("roles", "AppRole.CharityAccounts.Read.All"));
        assert!(!claims.has_claim("roles", "approle.charityaccounts.read.all"));
    }

    #[test]
    fn test_from_json_map_fans_out_arrays() {
        let payload = serde_json::json!({
            "aud": "api://a1ecdd8a-cb9d-41e1-99a4-5f99c6225e32",
            "roles": ["AppRole.CharityAccounts.Read.All", "AppRole.Reports.Read.All"],
            "appidacr": "2"
        });

        let map = payload.as_object().unwrap();
        let claims = ClaimSet::from_json_map(map);

        let roles: Vec<&str> = claims.claims_by_type("roles").collect();
        assert_eq!(roles.len(), 2);
        assert!(claims.has_claim("aud", "api://a1ecdd8a-cb9d-41e1-99a4-5f99c6225e32"));
        assert!(claims.has_claim("appidacr", "2"));
    }

    #[test]
    fn test_from_json_map_stringifies_scalars() {
        let payload = serde_json::json!({
            "exp": 1658240222,
            "verified": true
        });

        let claims = ClaimSet::from_json_map(payload.as_object().unwrap());

        assert!(claims.has_claim("exp", "1658240222"));
        assert!(claims.has_claim("verified", "true"));
    }

    #[test]
    fn test_from_json_map_skips_nested_values() {
        let payload = serde_json::json!({
            "roles": ["AppRole.CharityAccounts.Read.All", {"nested": "object"}],
            "meta": {"ver": "1.0"},
            "optional": null
        });

        let claims = ClaimSet::from_json_map(payload.as_object().unwrap());

        assert_eq!(claims.len(), 1);
        assert!(claims.has_claim("roles", "AppRole.CharityAccounts.Read.All"));
    }

    #[test]
    fn test_empty_set() {
        let claims = ClaimSet::default();

        assert!(claims.is_empty());
        assert_eq!(claims.claims_by_type("roles").count(), 0);
        assert!(!claims.has_claim("roles", "anything"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let claims = sample_set();

        let json = serde_json::to_string(&claims).unwrap();
        let deserialized: ClaimSet = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, claims);
    }

    #[test]
    fn test_from_iterator() {
        let claims: ClaimSet = vec![Claim::new("roles", "AppRole.Reports.Read.All")]
            .into_iter()
            .collect();

        assert_eq!(claims.len(), 1);
    }
}
