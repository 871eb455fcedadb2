//! Stored challenge data.
//!
//! One `StoredChallenge` records one outstanding assertion attempt for one
//! requester fingerprint. It is created by the issuer, kept in a
//! [`crate::providers::ChallengeStore`] until its TTL elapses, and consumed
//! (read-once) by the validator on the first validation attempt, successful
//! or not.

use chrono::{DateTime, Duration, Utc};
use webauthn_rs::prelude::{DiscoverableAuthentication, PasskeyAuthentication};
use webauthn_rs::prelude::Base64UrlSafeData;
use webauthn_rs_proto::RequestAuthenticationExtensions;

/// Opaque continuation state of the protocol engine for one assertion.
///
/// The engine that issued the challenge is the only component that can
/// interpret this; the lifecycle layer just carries it between `issue` and
/// `validate`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum AssertionState {
    /// Credential-bound flow: the allow-list was populated from a known user.
    Passkey(PasskeyAuthentication),

    /// Userless flow: the authenticator resolves the credential itself.
    Discoverable(DiscoverableAuthentication),

    /// Stand-in state for the mock verifier. Never produced in production.
    #[cfg(feature = "test-utils")]
    Stub {
        /// The raw challenge bytes the client is expected to sign over.
        challenge: Base64UrlSafeData,

        /// Credential ids the submission may reference; empty means any.
        allowed: Vec<Base64UrlSafeData>,
    },
}

/// A single outstanding challenge, keyed by requester fingerprint.
///
/// The store's TTL is advisory; the validator re-checks `expires_at` against
/// its own clock before delegating verification.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredChallenge {
    /// Cryptographically random challenge value.
    pub challenge: Base64UrlSafeData,

    /// Relying Party this challenge was issued for.
    pub relying_party_id: String,

    /// Validity window in milliseconds, as advertised to the client.
    pub timeout_ms: u32,

    /// Credential ids the requester may answer with; empty for userless flows.
    pub allowed_credentials: Vec<Base64UrlSafeData>,

    /// Whether the authenticator must verify the user for this login.
    pub user_verification_required: bool,

    /// Client extension inputs sent with the request options, if any.
    pub extensions: Option<RequestAuthenticationExtensions>,

    /// Engine continuation state needed to finish verification.
    pub state: AssertionState,

    /// Issuance timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl StoredChallenge {
    /// Whether the challenge has outlived its validity window at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Remaining lifetime at `now`; zero once expired.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

#[cfg(all(test, feature = "test-utils"))]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn stub_challenge(ttl: Duration) -> StoredChallenge {
        let issued_at = Utc::now();
        StoredChallenge {
            challenge: Base64UrlSafeData::from(vec![7u8; 32]),
            relying_party_id: "example.com".to_string(),
            timeout_ms: 60_000,
            allowed_credentials: Vec::new(),
            user_verification_required: false,
            extensions: None,
            state: AssertionState::Stub {
                challenge: Base64UrlSafeData::from(vec![7u8; 32]),
                allowed: Vec::new(),
            },
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn test_fresh_challenge_is_not_expired() {
        let challenge = stub_challenge(Duration::seconds(60));
        assert!(!challenge.is_expired(Utc::now()));
        assert!(challenge.remaining(Utc::now()) > Duration::zero());
    }

    #[test]
    fn test_challenge_expires_after_window() {
        let challenge = stub_challenge(Duration::seconds(60));
        let later = Utc::now() + Duration::seconds(61);
        assert!(challenge.is_expired(later));
        assert_eq!(challenge.remaining(later), Duration::zero());
    }

    #[test]
    fn test_challenge_round_trips_through_json() {
        let challenge = stub_challenge(Duration::seconds(60));
        let bytes = serde_json::to_vec(&challenge).unwrap();
        let restored: StoredChallenge = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(restored.relying_party_id, challenge.relying_party_id);
        assert_eq!(restored.challenge, challenge.challenge);
        assert_eq!(restored.expires_at, challenge.expires_at);
    }
}
