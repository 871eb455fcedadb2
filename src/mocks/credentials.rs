//! Mock credential repository for testing.

use crate::error::Result;
use crate::providers::{CredentialRepository, PasskeyCredential};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;
use webauthn_rs::prelude::Base64UrlSafeData;

/// In-memory [`CredentialRepository`].
///
/// **WARNING**: for tests only; nothing is persisted.
#[derive(Clone, Default)]
pub struct MockCredentialRepository {
    credentials: Arc<Mutex<HashMap<Uuid, Vec<PasskeyCredential>>>>,
}

impl MockCredentialRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credential for a user.
    pub fn insert(&self, credential: PasskeyCredential) {
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(credential.user_id)
            .or_default()
            .push(credential);
    }

    /// Build a placeholder credential for tests.
    ///
    /// The key material is filler; the mock verifier never decodes it.
    #[must_use]
    pub fn sample_credential(user: Uuid, credential_id: &[u8]) -> PasskeyCredential {
        PasskeyCredential {
            credential_id: Base64UrlSafeData::from(credential_id.to_vec()),
            user_id: user,
            public_key: vec![0u8; 77],
            counter: 0,
            created_at: Utc::now(),
            last_used: None,
        }
    }
}

impl CredentialRepository for MockCredentialRepository {
    async fn credentials_for(&self, user: &Uuid) -> Result<Vec<PasskeyCredential>> {
        Ok(self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user)
            .cloned()
            .unwrap_or_default())
    }
}
