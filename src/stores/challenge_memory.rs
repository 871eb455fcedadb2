//! In-memory challenge store.

use crate::challenge::StoredChallenge;
use crate::error::Result;
use crate::fingerprint::RequesterFingerprint;
use crate::providers::ChallengeStore;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory [`ChallengeStore`].
///
/// Challenges live in a mutex-guarded map keyed by fingerprint; expired
/// entries are swept on every access, and `take` double-checks expiry so a
/// stale entry can never validate. All state is process-local, so this store
/// only fits single-node deployments — use
/// [`super::RedisChallengeStore`] behind a load balancer.
#[derive(Clone, Default)]
pub struct MemoryChallengeStore {
    entries: Arc<Mutex<HashMap<String, StoredChallenge>>>,
}

impl MemoryChallengeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredChallenge>> {
        // A poisoned lock only means another thread panicked mid-access;
        // the map itself stays coherent for this access pattern.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sweep_expired(&self) {
        let now = Utc::now();
        self.lock().retain(|_, challenge| !challenge.is_expired(now));
    }
}

impl ChallengeStore for MemoryChallengeStore {
    async fn put(
        &self,
        fingerprint: &RequesterFingerprint,
        challenge: StoredChallenge,
        _ttl: Duration,
    ) -> Result<()> {
        self.sweep_expired();
        // Last write wins: a reissue silently invalidates the predecessor.
        self.lock().insert(fingerprint.as_str().to_string(), challenge);
        Ok(())
    }

    async fn get(&self, fingerprint: &RequesterFingerprint) -> Result<Option<StoredChallenge>> {
        self.sweep_expired();
        Ok(self.lock().get(fingerprint.as_str()).cloned())
    }

    async fn take(&self, fingerprint: &RequesterFingerprint) -> Result<Option<StoredChallenge>> {
        let removed = self.lock().remove(fingerprint.as_str());
        match removed {
            Some(challenge) if !challenge.is_expired(Utc::now()) => Ok(Some(challenge)),
            Some(_) => {
                tracing::debug!(fingerprint = %fingerprint, "Pending challenge had already expired");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, fingerprint: &RequesterFingerprint) -> Result<()> {
        self.lock().remove(fingerprint.as_str());
        Ok(())
    }
}
