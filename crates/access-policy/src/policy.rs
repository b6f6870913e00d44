//! Policy composition and evaluation.
//!
//! A policy is a named, ordered list of requirements combined with logical
//! AND. Evaluation short-circuits on the first failing requirement; the
//! failing requirement's name is logged at debug level, but the observable
//! outcome is only the decision itself.

use crate::requirement::{ClaimEqualsRequirement, Requirement, RoleRequirement};
use common::claims::ClaimSet;
use thiserror::Error;

/// Outcome of evaluating a policy against one token's claim set.
///
/// Computed once per request and never mutated afterwards. There is no
/// partial or soft-fail state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// Every requirement succeeded; the request may proceed.
    Succeed,

    /// At least one requirement failed; the request must be rejected before
    /// reaching protected logic.
    Fail,
}

impl AuthorizationDecision {
    /// Whether the decision allows the request to proceed.
    #[must_use]
    pub fn is_authorized(self) -> bool {
        matches!(self, AuthorizationDecision::Succeed)
    }
}

/// Error form of a failed decision, for callers that map outcomes onto
/// transport semantics.
///
/// A denied policy is a 403-equivalent. It is deliberately a different type
/// from the acquirer's errors so "access forbidden" can never be conflated
/// with "cannot determine" (503-equivalent) or "not authenticated"
/// (401-equivalent, handled by the upstream validation layer).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The claim set did not satisfy the policy.
    #[error("Authorization denied by policy: {0}")]
    AuthorizationDenied(String),
}

/// A named, ordered set of requirements combined with logical AND.
///
/// Different APIs instantiate this one abstraction with different
/// parameters; there is no per-API subclassing.
///
/// # Example
///
/// ```rust
/// use access_policy::Policy;
/// use common::claims::{Claim, ClaimSet};
///
/// let policy = Policy::new("charity-accounts-read")
///     .require_role("AppRole.CharityAccounts.Read.All")
///     .require_claim("azp", "09c26636-5e0c-4ff6-b551-e24d489046c9")
///     .require_claim("azpacr", "2");
///
/// let claims = ClaimSet::new(vec![
///     Claim::new("roles", "AppRole.CharityAccounts.Read.All"),
///     Claim::new("azp", "09c26636-5e0c-4ff6-b551-e24d489046c9"),
///     Claim::new("azpacr", "2"),
/// ]);
///
/// assert!(policy.authorize(&claims).is_authorized());
/// ```
pub struct Policy {
    name: String,
    requirements: Vec<Box<dyn Requirement>>,
}

impl Policy {
    /// Create an empty policy.
    ///
    /// A policy with no requirements succeeds for every claim set (AND over
    /// the empty set); real policies add at least one requirement.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: Vec::new(),
        }
    }

    /// Require an application role (see [`RoleRequirement`]).
    #[must_use]
    pub fn require_role(self, expected: impl Into<String>) -> Self {
        self.require(Box::new(RoleRequirement::new(expected)))
    }

    /// Require a claim to equal a value (see [`ClaimEqualsRequirement`]).
    #[must_use]
    pub fn require_claim(
        self,
        claim_type: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        self.require(Box::new(ClaimEqualsRequirement::new(claim_type, expected)))
    }

    /// Append a requirement to the policy.
    #[must_use]
    pub fn require(mut self, requirement: Box<dyn Requirement>) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// The policy's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of requirements in the policy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether the policy carries no requirements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Evaluate the policy against a claim set.
    ///
    /// Requirements are checked in order; the first failure fails the whole
    /// decision. Evaluation is deterministic and leaves the claim set
    /// untouched.
    #[must_use]
    pub fn authorize(&self, claims: &ClaimSet) -> AuthorizationDecision {
        for requirement in &self.requirements {
            if !requirement.evaluate(claims) {
                tracing::debug!(
                    target: "access_policy.policy",
                    policy = %self.name,
                    requirement = %requirement.name(),
                    "Authorization requirement not satisfied"
                );
                return AuthorizationDecision::Fail;
            }
        }

        tracing::debug!(
            target: "access_policy.policy",
            policy = %self.name,
            "Authorization succeeded"
        );
        AuthorizationDecision::Succeed
    }

    /// Evaluate the policy, returning an error on failure.
    ///
    /// Convenience for callers that propagate denial with `?`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::AuthorizationDenied`] with the policy name if
    /// any requirement fails.
    pub fn require_satisfied(&self, claims: &ClaimSet) -> Result<(), PolicyError> {
        match self.authorize(claims) {
            AuthorizationDecision::Succeed => Ok(()),
            AuthorizationDecision::Fail => {
                Err(PolicyError::AuthorizationDenied(self.name.clone()))
            }
        }
    }
}

impl std::fmt::Debug for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.requirements.iter().map(|r| r.name()).collect();
        f.debug_struct("Policy")
            .field("name", &self.name)
            .field("requirements", &names)
            .finish()
    }
}
