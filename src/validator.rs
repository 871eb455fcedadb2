//! Assertion validation.

use crate::error::{AssertError, Result};
use crate::fingerprint::RequesterFingerprint;
use crate::providers::verifier::VerifiedAssertion;
use crate::providers::{AssertionVerifier, ChallengeStore};
use chrono::Utc;
use webauthn_rs::prelude::CredentialID;
use webauthn_rs_proto::PublicKeyCredential;

/// Why a submission was turned away.
///
/// Internal taxonomy for logs and metrics. Do not echo these to end users:
/// to a client, every rejection is the same generic authentication failure,
/// so a probe cannot distinguish "no challenge" from "bad signature".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// No stored (or not-yet-expired) challenge for the fingerprint.
    NoPendingChallenge,

    /// The submission could not be parsed into an assertion response.
    MalformedAssertion,

    /// The submission parsed, but is not an assertion (e.g., attestation).
    WrongResponseKind,

    /// The protocol engine rejected signature, origin, RP-ID hash, or the
    /// user-verification requirement.
    VerificationFailed,
}

impl RejectionReason {
    /// Stable label for structured logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoPendingChallenge => "no_pending_challenge",
            Self::MalformedAssertion => "malformed_assertion",
            Self::WrongResponseKind => "wrong_response_kind",
            Self::VerificationFailed => "verification_failed",
        }
    }
}

/// Result of one validation attempt. No partial states.
#[derive(Debug, Clone, PartialEq)]
pub enum AssertionOutcome {
    /// The assertion verified; the credential is authenticated.
    Verified(VerifiedAssertion),

    /// The assertion was turned away.
    Rejected(RejectionReason),
}

impl AssertionOutcome {
    /// Whether this outcome authenticates the caller.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }

    /// The verified credential id, if any.
    #[must_use]
    pub const fn credential_id(&self) -> Option<&CredentialID> {
        match self {
            Self::Verified(verified) => Some(&verified.credential_id),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection reason, if any.
    #[must_use]
    pub const fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Self::Verified(_) => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Validates client assertions against stored challenges.
///
/// The stored challenge is consumed atomically before anything else runs, so
/// one challenge can never satisfy two validations and a failed attempt
/// forces a fresh challenge round-trip. All collaborators are supplied at
/// construction.
pub struct AssertionValidator<S, V> {
    store: S,
    verifier: V,
}

impl<S, V> AssertionValidator<S, V>
where
    S: ChallengeStore,
    V: AssertionVerifier,
{
    /// Create a validator from its collaborators.
    pub const fn new(store: S, verifier: V) -> Self {
        Self { store, verifier }
    }

    /// Validate a client-submitted assertion for the requester.
    ///
    /// Never panics and never treats a bad submission as an error: every
    /// protocol-level failure comes back as
    /// [`AssertionOutcome::Rejected`]. `Err` is reserved for infrastructure
    /// faults (store unreachable, corrupt stored credential), in which case
    /// the challenge is still gone — consumption happens first.
    ///
    /// # Errors
    ///
    /// Returns an error if the challenge store or credential repository
    /// fails.
    pub async fn validate(
        &self,
        fingerprint: &RequesterFingerprint,
        submitted: &str,
    ) -> Result<AssertionOutcome> {
        // Consume first: the challenge must be unusable afterwards whether
        // or not the rest of this call succeeds.
        let Some(challenge) = self.store.take(fingerprint).await? else {
            tracing::warn!(
                fingerprint = %fingerprint,
                reason = RejectionReason::NoPendingChallenge.as_str(),
                "Assertion rejected"
            );
            return Ok(AssertionOutcome::Rejected(RejectionReason::NoPendingChallenge));
        };

        // The store's TTL is advisory; the clock decides.
        if challenge.is_expired(Utc::now()) {
            tracing::warn!(
                fingerprint = %fingerprint,
                reason = RejectionReason::NoPendingChallenge.as_str(),
                "Assertion rejected: challenge expired in store"
            );
            return Ok(AssertionOutcome::Rejected(RejectionReason::NoPendingChallenge));
        }

        let Ok(raw) = serde_json::from_str::<serde_json::Value>(submitted) else {
            return Ok(Self::reject(fingerprint, RejectionReason::MalformedAssertion));
        };

        // An attestation object means the client answered the wrong ceremony.
        if raw
            .get("response")
            .and_then(|response| response.get("attestationObject"))
            .is_some()
        {
            return Ok(Self::reject(fingerprint, RejectionReason::WrongResponseKind));
        }

        let Ok(credential) = serde_json::from_value::<PublicKeyCredential>(raw) else {
            return Ok(Self::reject(fingerprint, RejectionReason::MalformedAssertion));
        };

        let user_verification_required = challenge.user_verification_required;
        match self.verifier.verify_assertion(&credential, challenge.state).await {
            Ok(verified) => {
                if user_verification_required && !verified.user_verified {
                    tracing::warn!(
                        fingerprint = %fingerprint,
                        reason = RejectionReason::VerificationFailed.as_str(),
                        "Assertion rejected: user verification required but absent"
                    );
                    return Ok(AssertionOutcome::Rejected(RejectionReason::VerificationFailed));
                }

                tracing::info!(
                    fingerprint = %fingerprint,
                    user_verified = verified.user_verified,
                    "Assertion verified"
                );
                Ok(AssertionOutcome::Verified(verified))
            }
            Err(AssertError::VerificationRejected(detail)) => {
                tracing::warn!(
                    fingerprint = %fingerprint,
                    reason = RejectionReason::VerificationFailed.as_str(),
                    detail = %detail,
                    "Assertion rejected"
                );
                Ok(AssertionOutcome::Rejected(RejectionReason::VerificationFailed))
            }
            Err(other) => Err(other),
        }
    }

    fn reject(fingerprint: &RequesterFingerprint, reason: RejectionReason) -> AssertionOutcome {
        tracing::warn!(
            fingerprint = %fingerprint,
            reason = reason.as_str(),
            "Assertion rejected"
        );
        AssertionOutcome::Rejected(reason)
    }
}
