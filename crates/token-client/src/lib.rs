//! Certificate-backed OAuth 2.0 client-credentials token acquisition.
//!
//! A confidential client proves its identity with an X.509 certificate held
//! in an external secret store: the certificate's private key signs a client
//! assertion, the authority's token endpoint exchanges the assertion for a
//! bearer access token, and the token is cached in memory until it nears
//! expiry.
//!
//! # Modules
//!
//! - `config` - Immutable client configuration
//! - `store` - Secret-store boundary for certificate retrieval
//! - `certificate` - Decoding stored certificate bundles
//! - `assertion` - Client-assertion signing
//! - `acquirer` - The token-endpoint exchange and the access token
//! - `errors` - Error taxonomy
//!
//! # Security
//!
//! - Private key material, assertions, and tokens are `SecretString`-backed
//!   and never reach logs or error messages
//! - Acquisition events are logged without values
//! - All network calls carry request and connect timeouts

pub mod acquirer;
pub mod assertion;
mod cache;
pub mod certificate;
pub mod config;
pub mod errors;
pub mod store;

pub use acquirer::{AccessToken, TokenAcquirer};
pub use config::ClientConfig;
pub use errors::AcquireError;
pub use store::{SecretStore, SecretStoreError};
