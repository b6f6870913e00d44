//! Authorization requirements evaluated against a validated claim set.
//!
//! A requirement is a named, pure predicate over the claims of an inbound
//! token: deterministic, no mutation of the claim set, no side effects
//! beyond the boolean outcome. Policies combine requirements with logical
//! AND (see [`crate::policy`]).

use common::claims::ClaimSet;

/// Claim type carrying application roles in access tokens.
pub const ROLES_CLAIM: &str = "roles";

/// A named predicate over the claim set of an incoming token.
///
/// Implementations must be pure: the same claim set always yields the same
/// outcome, and evaluation never mutates the claim set.
pub trait Requirement: Send + Sync {
    /// Diagnostic name, used when logging a failed evaluation.
    fn name(&self) -> &str;

    /// Whether the claim set satisfies this requirement.
    fn evaluate(&self, claims: &ClaimSet) -> bool;
}

/// Requires at least one `roles` claim with exactly the expected value.
///
/// Matching is a case-sensitive string comparison with no wildcard or
/// hierarchy semantics: `approle.charityaccounts.read.all` does not satisfy
/// a requirement for `AppRole.CharityAccounts.Read.All`. A token with no
/// `roles` claims fails every role requirement.
pub struct RoleRequirement {
    expected: String,
    name: String,
}

impl RoleRequirement {
    /// Create a requirement for the given application role.
    #[must_use]
    pub fn new(expected: impl Into<String>) -> Self {
        let expected = expected.into();
        let name = format!("role:{expected}");
        Self { expected, name }
    }
}

impl Requirement for RoleRequirement {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, claims: &ClaimSet) -> bool {
        claims
            .claims_by_type(ROLES_CLAIM)
            .any(|value| value == self.expected)
    }
}

/// Requires at least one claim of the given type with exactly the expected
/// value.
///
/// Used for application-identity conditions, e.g. the authorized-party claim
/// must name a specific client application, or the client-authentication-
/// method claim must be `"2"` (certificate-based) to exclude tokens obtained
/// with a client secret or by a public client.
pub struct ClaimEqualsRequirement {
    claim_type: String,
    expected: String,
    name: String,
}

impl ClaimEqualsRequirement {
    /// Create a requirement for `claim_type == expected`.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, expected: impl Into<String>) -> Self {
        let claim_type = claim_type.into();
        let expected = expected.into();
        let name = format!("claim:{claim_type}={expected}");
        Self {
            claim_type,
            expected,
            name,
        }
    }
}

impl Requirement for ClaimEqualsRequirement {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, claims: &ClaimSet) -> bool {
        claims.has_claim(&self.claim_type, &self.expected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::claims::Claim;

    #[test]
    fn test_role_requirement_matches_exact_value() {
        let claims = ClaimSet::new(vec![Claim::new(
            ROLES_CLAIM,
            "AppRole.CharityAccounts.Read.All",
        )]);

        let requirement = RoleRequirement::new("AppRole.CharityAccounts.Read.All");
        assert!(requirement.evaluate(&claims));
    }

    #[test]
    fn test_role_requirement_is_case_sensitive() {
        let claims = ClaimSet::new(vec![Claim::new(
            ROLES_CLAIM,
            "approle.charityaccounts.read.all",
        )]);

        let requirement = RoleRequirement::new("AppRole.CharityAccounts.Read.All");
        assert!(!requirement.evaluate(&claims));
    }

    #[test]
    fn test_role_requirement_no_roles_claims_fails() {
        let claims = ClaimSet::new(vec![Claim::new("azp", "some-app")]);

        let requirement = RoleRequirement::new("AppRole.CharityAccounts.Read.All");
        assert!(!requirement.evaluate(&claims));
    }

    #[test]
    fn test_role_requirement_multiple_roles_one_match() {
        let claims = ClaimSet::new(vec![
            Claim::new(ROLES_CLAIM, "AppRole.Reports.Read.All"),
            Claim::new(ROLES_CLAIM, "AppRole.CharityAccounts.Read.All"),
            Claim::new(ROLES_CLAIM, "AppRole.Donations.Write.All"),
        ]);

        let requirement = RoleRequirement::new("AppRole.CharityAccounts.Read.All");
        assert!(requirement.evaluate(&claims));
    }

    #[test]
    fn test_role_requirement_no_partial_match() {
        let claims = ClaimSet::new(vec![Claim::new(ROLES_CLAIM, "AppRole.CharityAccounts")]);

        let requirement = RoleRequirement::new("AppRole.CharityAccounts.Read.All");
        assert!(!requirement.evaluate(&claims));
    }

    #[test]
    fn test_claim_equals_requirement() {
        let claims = ClaimSet::new(vec![Claim::new("appidacr", "2")]);

        assert!(ClaimEqualsRequirement::new("appidacr", "2").evaluate(&claims));
        assert!(!ClaimEqualsRequirement::new("appidacr", "1").evaluate(&claims));
        assert!(!ClaimEqualsRequirement::new("azpacr", "2").evaluate(&claims));
    }

    #[test]
    fn test_requirement_names_are_diagnostic() {
        let role = RoleRequirement::new("AppRole.CharityAccounts.Read.All");
        assert_eq!(role.name(), "role:AppRole.CharityAccounts.Read.All");

        let claim = ClaimEqualsRequirement::new("azpacr", "2");
        assert_eq!(claim.name(), "claim:azpacr=2");
    }

    #[test]
    fn test_evaluation_does_not_consume_claims() {
        let claims = ClaimSet::new(vec![Claim::new(ROLES_CLAIM, "AppRole.Reports.Read.All")]);
        let requirement = RoleRequirement::new("AppRole.Reports.Read.All");

        // Evaluating twice over the same set yields the same outcome
        assert!(requirement.evaluate(&claims));
        assert!(requirement.evaluate(&claims));
        assert_eq!(claims.len(), 1);
    }
}
