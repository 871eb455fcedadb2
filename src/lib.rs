//! # WebAuthn Gate
//!
//! Assertion-challenge lifecycle management around an external WebAuthn
//! protocol engine: issue a challenge bound to one requester, hold it
//! transiently, and validate the returned assertion against exactly one
//! matching, unexpired challenge, exactly once.
//!
//! The cryptographic protocol itself (CBOR, COSE, attestation formats,
//! signature checks) lives in `webauthn-rs`; this crate configures it, keys
//! challenges by a requester fingerprint, and enforces single-use and expiry.
//!
//! ## Flow
//!
//! ```text
//! Issue(fingerprint, user?) ──▶ ChallengeStore.put ──▶ options to client
//! client signs ──▶ Validate(fingerprint, assertion)
//!     ──▶ ChallengeStore.take (atomic, single-use)
//!     ──▶ engine verification ──▶ Verified | Rejected
//! ```
//!
//! A challenge is terminal after one of: consumption (success or failure)
//! or expiry. Reissuing replaces any unconsumed predecessor for the same
//! fingerprint.
//!
//! ## Example
//!
//! ```rust,ignore
//! use webauthn_gate::*;
//!
//! let config = WebAuthnConfig::new("app.example.com", "Example", "https://app.example.com");
//! let store = MemoryChallengeStore::new();
//! let verifier = WebauthnVerifier::new(&config, repository.clone())?;
//!
//! let issuer = AssertionChallengeIssuer::new(config, store.clone(), verifier.clone(), repository);
//! let validator = AssertionValidator::new(store, verifier);
//!
//! // 1. Client asks to log in
//! let options = issuer.issue(&fingerprint, Some(&user_id)).await?;
//!
//! // 2. Client answers with a signed assertion
//! match validator.validate(&fingerprint, &body).await? {
//!     AssertionOutcome::Verified(v) => login(v.credential_id),
//!     AssertionOutcome::Rejected(_) => deny(),
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod challenge;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod issuer;
pub mod providers;
pub mod stores;
pub mod validator;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use challenge::{AssertionState, StoredChallenge};
pub use config::{UserlessPolicy, WebAuthnConfig};
pub use error::{AssertError, Result};
pub use fingerprint::RequesterFingerprint;
pub use issuer::AssertionChallengeIssuer;
pub use providers::{
    AssertionVerifier, ChallengeStore, CredentialRepository, PasskeyCredential, VerifiedAssertion,
    WebauthnVerifier,
};
pub use stores::{MemoryChallengeStore, RedisChallengeStore};
pub use validator::{AssertionOutcome, AssertionValidator, RejectionReason};
