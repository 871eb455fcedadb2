//! Protocol-engine trait.
//!
//! The cryptographic side of WebAuthn (challenge randomness, origin and RP-ID
//! hash checks, signature verification, counter monotonicity, user-verification
//! flags) lives behind this trait. The lifecycle layer never looks inside it.

use super::PasskeyCredential;
use crate::challenge::AssertionState;
use crate::error::Result;
use webauthn_rs::prelude::CredentialID;
use webauthn_rs_proto::{PublicKeyCredential, RequestChallengeResponse};

/// Outcome of a successful cryptographic verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedAssertion {
    /// The credential that signed the assertion.
    pub credential_id: CredentialID,

    /// Whether the authenticator verified the user (PIN, biometric).
    pub user_verified: bool,

    /// Post-assertion signature counter; callers should persist it.
    pub counter: u32,
}

/// WebAuthn assertion engine.
///
/// Implemented in production by [`super::WebauthnVerifier`] over
/// `webauthn-rs`, and by a deterministic mock for tests.
pub trait AssertionVerifier: Send + Sync {
    /// Begin an assertion: produce client request options plus the opaque
    /// continuation state verification will need.
    ///
    /// An empty credential slice begins a userless (discoverable) request
    /// with an empty allow-list.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored credential cannot be decoded or the
    /// engine refuses to start the ceremony.
    fn start_assertion(
        &self,
        credentials: &[PasskeyCredential],
    ) -> impl std::future::Future<Output = Result<(RequestChallengeResponse, AssertionState)>> + Send;

    /// Verify a client assertion against previously issued state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AssertError::VerificationRejected`] when the
    /// engine rejects the assertion, and other variants for infrastructure
    /// faults (credential lookup, corrupt stored material).
    fn verify_assertion(
        &self,
        credential: &PublicKeyCredential,
        state: AssertionState,
    ) -> impl std::future::Future<Output = Result<VerifiedAssertion>> + Send;
}
