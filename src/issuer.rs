//! Assertion challenge issuance.

use crate::challenge::StoredChallenge;
use crate::config::WebAuthnConfig;
use crate::error::Result;
use crate::fingerprint::RequesterFingerprint;
use crate::providers::{AssertionVerifier, ChallengeStore, CredentialRepository};
use chrono::Utc;
use uuid::Uuid;
use webauthn_rs_proto::RequestChallengeResponse;

/// Issues assertion challenges and records them for later validation.
///
/// One live challenge exists per requester fingerprint; issuing again before
/// the first is consumed replaces it, so a client can only ever answer its
/// most recent challenge.
///
/// All collaborators are supplied at construction.
pub struct AssertionChallengeIssuer<S, V, C> {
    config: WebAuthnConfig,
    store: S,
    verifier: V,
    credentials: C,
}

impl<S, V, C> AssertionChallengeIssuer<S, V, C>
where
    S: ChallengeStore,
    V: AssertionVerifier,
    C: CredentialRepository,
{
    /// Create an issuer from its collaborators.
    pub const fn new(config: WebAuthnConfig, store: S, verifier: V, credentials: C) -> Self {
        Self {
            config,
            store,
            verifier,
            credentials,
        }
    }

    /// The relying-party configuration in force.
    pub const fn config(&self) -> &WebAuthnConfig {
        &self.config
    }

    /// Issue a fresh challenge for the requester.
    ///
    /// With a `user`, the allow-list is populated from that user's
    /// registered credentials; without one (or when the user holds none)
    /// the request is userless and any registered credential may answer.
    ///
    /// The returned options are ready to serialize to the client as a
    /// WebAuthn "get assertion" payload.
    ///
    /// # Errors
    ///
    /// Returns an error if credential lookup, the protocol engine, or the
    /// challenge store fails.
    pub async fn issue(
        &self,
        fingerprint: &RequesterFingerprint,
        user: Option<&Uuid>,
    ) -> Result<RequestChallengeResponse> {
        let registered = match user {
            Some(user) => self.credentials.credentials_for(user).await?,
            None => Vec::new(),
        };

        let (options, state) = self.verifier.start_assertion(&registered).await?;

        let issued_at = Utc::now();
        let challenge = StoredChallenge {
            challenge: options.public_key.challenge.clone(),
            relying_party_id: self.config.rp_id.clone(),
            timeout_ms: options.public_key.timeout.unwrap_or_else(|| self.config.timeout_ms()),
            allowed_credentials: options
                .public_key
                .allow_credentials
                .iter()
                .map(|c| c.id.clone())
                .collect(),
            user_verification_required: self.config.user_verification_required(),
            extensions: options.public_key.extensions.clone(),
            state,
            issued_at,
            expires_at: issued_at + self.config.challenge_ttl,
        };

        self.store
            .put(fingerprint, challenge, self.config.challenge_ttl)
            .await?;

        tracing::info!(
            fingerprint = %fingerprint,
            user_bound = user.is_some(),
            allow_credentials = options.public_key.allow_credentials.len(),
            "Issued assertion challenge"
        );

        Ok(options)
    }

    /// The outstanding challenge for the requester, if one is still live.
    ///
    /// Does not consume the challenge.
    ///
    /// # Errors
    ///
    /// Returns an error if the challenge store fails.
    pub async fn pending(
        &self,
        fingerprint: &RequesterFingerprint,
    ) -> Result<Option<StoredChallenge>> {
        let pending = self.store.get(fingerprint).await?;
        Ok(pending.filter(|challenge| !challenge.is_expired(Utc::now())))
    }
}
