//! Common types shared between the token-client and access-policy crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for the claim-access contract over validated tokens
pub mod claims;
