//! Production assertion engine over `webauthn-rs`.

use super::{CredentialRepository, PasskeyCredential};
use crate::challenge::AssertionState;
use crate::config::WebAuthnConfig;
use crate::error::{AssertError, Result};
use crate::providers::verifier::{AssertionVerifier, VerifiedAssertion};
use std::sync::Arc;
use webauthn_rs::prelude::{
    AuthenticationResult, DiscoverableKey, Passkey, Url, Webauthn, WebauthnBuilder,
};
use webauthn_rs_proto::{PublicKeyCredential, RequestChallengeResponse};

/// [`AssertionVerifier`] backed by `webauthn-rs`.
///
/// Owns the engine configured for one relying party, plus a credential
/// repository used to resolve the signing user in discoverable flows.
#[derive(Clone)]
pub struct WebauthnVerifier<R> {
    webauthn: Arc<Webauthn>,
    credentials: R,
}

impl<R> WebauthnVerifier<R> {
    /// Build the engine for the configured relying party.
    ///
    /// # Errors
    ///
    /// Returns [`AssertError::InvalidConfiguration`] if the origin is not a
    /// valid URL or the engine rejects the relying-party parameters.
    pub fn new(config: &WebAuthnConfig, credentials: R) -> Result<Self> {
        let origin = Url::parse(&config.origin)
            .map_err(|e| AssertError::InvalidConfiguration(format!("origin: {e}")))?;

        let timeout = config
            .challenge_ttl
            .to_std()
            .map_err(|e| AssertError::InvalidConfiguration(format!("challenge ttl: {e}")))?;

        let webauthn = WebauthnBuilder::new(&config.rp_id, &origin)
            .map_err(|e| AssertError::InvalidConfiguration(e.to_string()))?
            .rp_name(&config.rp_name)
            .timeout(timeout)
            .build()
            .map_err(|e| AssertError::InvalidConfiguration(e.to_string()))?;

        Ok(Self {
            webauthn: Arc::new(webauthn),
            credentials,
        })
    }

    fn decode_passkey(credential: &PasskeyCredential) -> Result<Passkey> {
        serde_json::from_slice(&credential.public_key).map_err(|e| {
            tracing::error!(
                user_id = %credential.user_id,
                error = %e,
                "Stored passkey material failed to decode"
            );
            AssertError::CredentialCorrupt
        })
    }

    fn verified(result: &AuthenticationResult) -> VerifiedAssertion {
        VerifiedAssertion {
            credential_id: result.cred_id().clone(),
            user_verified: result.user_verified(),
            counter: result.counter(),
        }
    }
}

impl<R> AssertionVerifier for WebauthnVerifier<R>
where
    R: CredentialRepository,
{
    async fn start_assertion(
        &self,
        credentials: &[PasskeyCredential],
    ) -> Result<(RequestChallengeResponse, AssertionState)> {
        if credentials.is_empty() {
            let (options, state) = self
                .webauthn
                .start_discoverable_authentication()
                .map_err(|e| AssertError::VerificationRejected(e.to_string()))?;
            return Ok((options, AssertionState::Discoverable(state)));
        }

        let passkeys = credentials
            .iter()
            .map(Self::decode_passkey)
            .collect::<Result<Vec<_>>>()?;

        let (options, state) = self
            .webauthn
            .start_passkey_authentication(&passkeys)
            .map_err(|e| AssertError::VerificationRejected(e.to_string()))?;

        Ok((options, AssertionState::Passkey(state)))
    }

    async fn verify_assertion(
        &self,
        credential: &PublicKeyCredential,
        state: AssertionState,
    ) -> Result<VerifiedAssertion> {
        match state {
            AssertionState::Passkey(state) => self
                .webauthn
                .finish_passkey_authentication(credential, &state)
                .map(|result| Self::verified(&result))
                .map_err(|e| AssertError::VerificationRejected(e.to_string())),

            AssertionState::Discoverable(state) => {
                // The authenticator picked the credential; resolve the signing
                // user from the response before the keys can be loaded.
                let (user, _cred_id) = self
                    .webauthn
                    .identify_discoverable_authentication(credential)
                    .map_err(|e| AssertError::VerificationRejected(e.to_string()))?;

                let stored = self.credentials.credentials_for(&user).await?;
                let keys = stored
                    .iter()
                    .map(|c| Self::decode_passkey(c).map(|pk| DiscoverableKey::from(&pk)))
                    .collect::<Result<Vec<_>>>()?;

                self.webauthn
                    .finish_discoverable_authentication(credential, state, &keys)
                    .map(|result| Self::verified(&result))
                    .map_err(|e| AssertError::VerificationRejected(e.to_string()))
            }

            #[cfg(feature = "test-utils")]
            AssertionState::Stub { .. } => {
                tracing::warn!("Stub assertion state reached the production engine");
                Err(AssertError::VerificationRejected(
                    "stub state is not verifiable".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::MockCredentialRepository;

    #[test]
    fn test_engine_builds_from_valid_config() {
        let config = WebAuthnConfig::new("example.com", "Example", "https://example.com");
        let verifier = WebauthnVerifier::new(&config, MockCredentialRepository::new());
        assert!(verifier.is_ok());
    }

    #[test]
    fn test_engine_rejects_malformed_origin() {
        let config = WebAuthnConfig::new("example.com", "Example", "not a url");
        let result = WebauthnVerifier::new(&config, MockCredentialRepository::new());
        assert!(matches!(result, Err(AssertError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn test_userless_start_produces_empty_allow_list() {
        let config = WebAuthnConfig::new("example.com", "Example", "https://example.com");
        let verifier = WebauthnVerifier::new(&config, MockCredentialRepository::new()).unwrap();

        let (options, state) = verifier.start_assertion(&[]).await.unwrap();
        assert!(options.public_key.allow_credentials.is_empty());
        assert!(matches!(state, AssertionState::Discoverable(_)));
    }
}
