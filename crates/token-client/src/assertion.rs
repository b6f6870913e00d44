//! Client-assertion signing for the client-credentials exchange.
//!
//! The confidential client proves possession of its certificate by signing a
//! short-lived JWT with the certificate's private key; the authority
//! verifies the signature against the registered certificate. The `x5t#S256`
//! header carries the certificate thumbprint the authority uses to select
//! that certificate.

use crate::certificate::ClientCertificate;
use crate::errors::AcquireError;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Assertion type parameter sent alongside the signed JWT
/// (RFC 7523 JWT client authentication).
pub const CLIENT_ASSERTION_TYPE: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Assertion lifetime in seconds. Assertions are one-shot proofs; a short
/// window limits replay exposure.
const ASSERTION_LIFETIME_SECS: i64 = 300;

/// Claims carried by a client assertion.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    /// Issuer: the client application id.
    pub iss: String,

    /// Subject: the client application id (same as `iss` for this grant).
    pub sub: String,

    /// Audience: the authority's token endpoint.
    pub aud: String,

    /// Unique assertion id, fresh per exchange.
    pub jti: String,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Not-before timestamp (Unix epoch seconds).
    pub nbf: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

/// Sign a fresh client assertion for `client_id` against `token_endpoint`.
///
/// # Errors
///
/// Returns [`AcquireError::MalformedCertificate`] if the certificate's key
/// is rejected at signing time.
pub(crate) fn sign_client_assertion(
    certificate: &ClientCertificate,
    client_id: &str,
    token_endpoint: &str,
) -> Result<String, AcquireError> {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: client_id.to_string(),
        sub: client_id.to_string(),
        aud: token_endpoint.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now,
        nbf: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.x5t_s256 = Some(certificate.thumbprint().to_string());

    encode(&header, &claims, certificate.signing_key()).map_err(|e| {
        AcquireError::MalformedCertificate(format!("failed to sign client assertion: {e}"))
    })
}
