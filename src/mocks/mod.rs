//! Mock provider implementations for testing.
//!
//! Simple, in-memory implementations of the provider traits so the
//! challenge lifecycle can be exercised without authenticator hardware or
//! external services.

pub mod credentials;
pub mod verifier;

pub use credentials::MockCredentialRepository;
pub use verifier::MockAssertionVerifier;
