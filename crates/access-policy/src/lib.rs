//! Claims-based authorization for protected APIs.
//!
//! Evaluates multi-condition policies over the claim set of an inbound
//! access token. This crate only sees tokens that already passed structural
//! validation (signature, issuer, audience, expiry) in an external JWT
//! validation layer; tokens failing that stage never reach policy
//! evaluation.
//!
//! # Modules
//!
//! - `requirement` - Predicates over a claim set (role and claim-equality)
//! - `policy` - Ordered requirement composition and the accept/reject decision

pub mod policy;
pub mod requirement;

pub use policy::{AuthorizationDecision, Policy, PolicyError};
pub use requirement::{ClaimEqualsRequirement, Requirement, RoleRequirement, ROLES_CLAIM};
