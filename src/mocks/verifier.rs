//! Mock assertion engine for testing.
//!
//! Issues real random challenges and "verifies" a submission by comparing
//! the challenge echoed in its clientDataJSON against the issued value, in
//! constant time. No signatures are checked, so the full challenge lifecycle
//! can be tested without an authenticator.

use crate::challenge::AssertionState;
use crate::error::{AssertError, Result};
use crate::providers::verifier::{AssertionVerifier, VerifiedAssertion};
use crate::providers::PasskeyCredential;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use webauthn_rs::prelude::CredentialID;
use webauthn_rs::prelude::Base64UrlSafeData;
use webauthn_rs_proto::{PublicKeyCredential, RequestChallengeResponse};

/// Mock [`AssertionVerifier`].
///
/// **WARNING**: performs no cryptography. Tests only.
#[derive(Debug, Clone)]
pub struct MockAssertionVerifier {
    rp_id: String,
    timeout_ms: u32,
    user_verification_required: bool,
    /// What `user_verified` the mock reports on success.
    report_user_verified: bool,
}

impl MockAssertionVerifier {
    /// Create a mock engine for the given relying party.
    #[must_use]
    pub fn new(rp_id: impl Into<String>) -> Self {
        Self {
            rp_id: rp_id.into(),
            timeout_ms: 60_000,
            user_verification_required: false,
            report_user_verified: true,
        }
    }

    /// Ask clients for user verification.
    #[must_use]
    pub const fn with_user_verification(mut self, required: bool) -> Self {
        self.user_verification_required = required;
        self
    }

    /// Control the `user_verified` flag reported on success.
    #[must_use]
    pub const fn reporting_user_verified(mut self, verified: bool) -> Self {
        self.report_user_verified = verified;
        self
    }

    fn rejected(detail: &str) -> AssertError {
        AssertError::VerificationRejected(detail.to_string())
    }
}

impl AssertionVerifier for MockAssertionVerifier {
    async fn start_assertion(
        &self,
        credentials: &[PasskeyCredential],
    ) -> Result<(RequestChallengeResponse, AssertionState)> {
        let mut bytes = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let challenge = Base64UrlSafeData::from(bytes);

        let allowed: Vec<Base64UrlSafeData> = credentials
            .iter()
            .map(|c| c.credential_id.clone())
            .collect();

        let allow_credentials: Vec<serde_json::Value> = allowed
            .iter()
            .map(|id| serde_json::json!({ "type": "public-key", "id": id }))
            .collect();

        let options: RequestChallengeResponse = serde_json::from_value(serde_json::json!({
            "publicKey": {
                "challenge": challenge,
                "timeout": self.timeout_ms,
                "rpId": self.rp_id,
                "allowCredentials": allow_credentials,
                "userVerification":
                    if self.user_verification_required { "required" } else { "preferred" },
            }
        }))
        .map_err(|e| AssertError::Serialization(e.to_string()))?;

        let state = AssertionState::Stub { challenge, allowed };
        Ok((options, state))
    }

    async fn verify_assertion(
        &self,
        credential: &PublicKeyCredential,
        state: AssertionState,
    ) -> Result<VerifiedAssertion> {
        let AssertionState::Stub { challenge, allowed } = state else {
            return Err(Self::rejected("mock engine received production state"));
        };

        let raw_client_data: &[u8] = credential.response.client_data_json.as_ref();
        let client_data: serde_json::Value = serde_json::from_slice(raw_client_data)
            .map_err(|_| Self::rejected("clientDataJSON is not JSON"))?;

        if client_data.get("type").and_then(serde_json::Value::as_str) != Some("webauthn.get") {
            return Err(Self::rejected("clientDataJSON type is not webauthn.get"));
        }

        let submitted = client_data
            .get("challenge")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Self::rejected("clientDataJSON carries no challenge"))?;
        let submitted = URL_SAFE_NO_PAD
            .decode(submitted)
            .map_err(|_| Self::rejected("challenge is not base64url"))?;

        let issued: &[u8] = challenge.as_ref();
        if !constant_time_eq::constant_time_eq(&submitted, issued) {
            return Err(Self::rejected("challenge mismatch"));
        }

        if !allowed.is_empty() && !allowed.contains(&credential.raw_id) {
            return Err(Self::rejected("credential not in allow-list"));
        }

        Ok(VerifiedAssertion {
            credential_id: CredentialID::from(Vec::<u8>::from(credential.raw_id.clone())),
            user_verified: self.report_user_verified,
            counter: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn submission(challenge_b64: &str, cred_id: &[u8]) -> PublicKeyCredential {
        let client_data = serde_json::json!({
            "type": "webauthn.get",
            "challenge": challenge_b64,
            "origin": "https://example.com",
        });
        let value = serde_json::json!({
            "id": URL_SAFE_NO_PAD.encode(cred_id),
            "rawId": URL_SAFE_NO_PAD.encode(cred_id),
            "type": "public-key",
            "response": {
                "authenticatorData": URL_SAFE_NO_PAD.encode([0u8; 37]),
                "clientDataJSON": URL_SAFE_NO_PAD.encode(client_data.to_string().as_bytes()),
                "signature": URL_SAFE_NO_PAD.encode([0u8; 64]),
                "userHandle": null,
            },
            "extensions": {},
        });
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_succeeds() {
        let verifier = MockAssertionVerifier::new("example.com");
        let (options, state) = verifier.start_assertion(&[]).await.unwrap();

        let issued: &[u8] = options.public_key.challenge.as_ref();
        let credential = submission(&URL_SAFE_NO_PAD.encode(issued), b"cred-1");

        let verified = verifier.verify_assertion(&credential, state).await.unwrap();
        assert!(verified.user_verified);
    }

    #[tokio::test]
    async fn test_wrong_challenge_is_rejected() {
        let verifier = MockAssertionVerifier::new("example.com");
        let (_, state) = verifier.start_assertion(&[]).await.unwrap();

        let credential = submission(&URL_SAFE_NO_PAD.encode([3u8; 32]), b"cred-1");
        let result = verifier.verify_assertion(&credential, state).await;
        assert!(matches!(result, Err(AssertError::VerificationRejected(_))));
    }

    #[tokio::test]
    async fn test_foreign_credential_is_rejected() {
        use crate::mocks::MockCredentialRepository;

        let verifier = MockAssertionVerifier::new("example.com");
        let user = uuid::Uuid::new_v4();
        let creds = vec![MockCredentialRepository::sample_credential(user, b"cred-1")];
        let (options, state) = verifier.start_assertion(&creds).await.unwrap();

        let issued: &[u8] = options.public_key.challenge.as_ref();
        let credential = submission(&URL_SAFE_NO_PAD.encode(issued), b"cred-other");

        let result = verifier.verify_assertion(&credential, state).await;
        assert!(matches!(result, Err(AssertError::VerificationRejected(_))));
    }
}
