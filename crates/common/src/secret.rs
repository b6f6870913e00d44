//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use them for all
//! sensitive values that flow through the token pipeline: vault secrets,
//! decoded certificate material, client assertions, and bearer tokens.
//!
//! # Compile-Time Safety
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so any
//! struct that derives `Debug` while holding a secret gets safe logging
//! behavior for free. Reading the actual value requires an explicit
//! `expose_secret()` call, which keeps accidental `{:?}` leaks out of logs
//! and error messages.
//!
//! # Memory Safety
//!
//! Secrets are zeroized when dropped, so key material and tokens do not
//! linger in memory after use.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct TokenRequest {
//!     client_id: String,
//!     client_assertion: SecretString,  // Safe: Debug shows "[REDACTED]"
//! }
//!
//! let req = TokenRequest {
//!     client_id: "09c26636-5e0c-4ff6-b551-e24d489046c9".to_string(),
//!     client_assertion: SecretString::from("eyJhbGciOiJSUzI1NiJ9..."),
//! };
//!
//! // This is safe - the assertion is redacted
//! println!("{:?}", req);
//!
//! // To access the actual value, you must explicitly call expose_secret()
//! let assertion: &str = req.client_assertion.expose_secret();
//! ```
//!
//! # Usage Guidelines
//!
//! Use `SecretString` for:
//! - Secret-store values (base64 certificate bundles)
//! - Bearer access tokens
//! - Signed client assertions
//! - `Authorization` header values
//!
//! Use `SecretBox<T>` for:
//! - Custom secret types (e.g., `SecretBox<[u8]>` for binary key material)

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};
