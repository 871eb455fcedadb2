//! Redis-based challenge store.
//!
//! # Architecture
//!
//! One key per requester fingerprint:
//! `webauthn:assert:{fingerprint}` → JSON-serialized [`StoredChallenge`].
//!
//! - **TTL**: `SET .. EX` so abandoned challenges vanish on their own
//! - **Atomic consumption**: `GETDEL` performs get + delete in one command,
//!   so concurrent validations resolve to a single winner
//! - **Overwrite-on-reissue**: a plain `SET` replaces any unconsumed
//!   predecessor for the same fingerprint
//!
//! Payloads are JSON rather than a compact binary codec: the engine state
//! inside [`StoredChallenge`] relies on serde representations (untagged
//! enums, maps) that binary formats refuse to encode.

use crate::challenge::StoredChallenge;
use crate::error::{AssertError, Result};
use crate::fingerprint::RequesterFingerprint;
use crate::providers::ChallengeStore;
use chrono::{Duration, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

/// Redis-backed [`ChallengeStore`] for multi-node deployments.
pub struct RedisChallengeStore {
    conn_manager: ConnectionManager,
}

impl RedisChallengeStore {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| AssertError::Store(format!("failed to create Redis client: {e}")))?;

        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            AssertError::Store(format!("failed to create Redis connection manager: {e}"))
        })?;

        Ok(Self { conn_manager })
    }

    fn key(fingerprint: &RequesterFingerprint) -> String {
        format!("webauthn:assert:{}", fingerprint.as_str())
    }

    fn decode(bytes: &[u8]) -> Result<StoredChallenge> {
        serde_json::from_slice(bytes).map_err(|e| AssertError::Serialization(e.to_string()))
    }
}

impl Clone for RedisChallengeStore {
    fn clone(&self) -> Self {
        Self {
            conn_manager: self.conn_manager.clone(),
        }
    }
}

impl ChallengeStore for RedisChallengeStore {
    async fn put(
        &self,
        fingerprint: &RequesterFingerprint,
        challenge: StoredChallenge,
        ttl: Duration,
    ) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let key = Self::key(fingerprint);

        let payload = serde_json::to_vec(&challenge)
            .map_err(|e| AssertError::Serialization(e.to_string()))?;

        let ttl_seconds = u64::try_from(ttl.num_seconds()).unwrap_or(1).max(1);

        let _: () = conn
            .set_ex(&key, payload, ttl_seconds)
            .await
            .map_err(|e| AssertError::Store(format!("failed to store challenge: {e}")))?;

        tracing::info!(
            fingerprint = %fingerprint,
            rp_id = %challenge.relying_party_id,
            ttl_seconds,
            "Stored assertion challenge in Redis"
        );

        Ok(())
    }

    async fn get(&self, fingerprint: &RequesterFingerprint) -> Result<Option<StoredChallenge>> {
        let mut conn = self.conn_manager.clone();
        let key = Self::key(fingerprint);

        let payload: Option<Vec<u8>> = conn
            .get(&key)
            .await
            .map_err(|e| AssertError::Store(format!("failed to read challenge: {e}")))?;

        match payload {
            Some(bytes) => {
                let challenge = Self::decode(&bytes)?;
                if challenge.is_expired(Utc::now()) {
                    return Ok(None);
                }
                Ok(Some(challenge))
            }
            None => Ok(None),
        }
    }

    async fn take(&self, fingerprint: &RequesterFingerprint) -> Result<Option<StoredChallenge>> {
        let mut conn = self.conn_manager.clone();
        let key = Self::key(fingerprint);

        // GETDEL is atomic, so at most one concurrent validation can win.
        let payload: Option<Vec<u8>> = conn
            .get_del(&key)
            .await
            .map_err(|e| AssertError::Store(format!("failed to consume challenge: {e}")))?;

        match payload {
            Some(bytes) => {
                let challenge = Self::decode(&bytes)?;

                // The TTL should have removed this already; treat the clock
                // as authoritative, not the cache.
                if challenge.is_expired(Utc::now()) {
                    tracing::warn!(
                        fingerprint = %fingerprint,
                        "Consumed challenge had outlived its window"
                    );
                    return Ok(None);
                }

                tracing::info!(
                    fingerprint = %fingerprint,
                    "Consumed assertion challenge (single-use)"
                );

                Ok(Some(challenge))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, fingerprint: &RequesterFingerprint) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let key = Self::key(fingerprint);

        let _: () = conn
            .del(&key)
            .await
            .map_err(|e| AssertError::Store(format!("failed to delete challenge: {e}")))?;

        tracing::debug!(fingerprint = %fingerprint, "Deleted assertion challenge");

        Ok(())
    }
}

#[cfg(all(test, feature = "test-utils"))]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::challenge::AssertionState;
    use webauthn_rs::prelude::Base64UrlSafeData;

    fn challenge(ttl: Duration) -> StoredChallenge {
        let issued_at = Utc::now();
        StoredChallenge {
            challenge: Base64UrlSafeData::from(vec![9u8; 32]),
            relying_party_id: "example.com".to_string(),
            timeout_ms: 60_000,
            allowed_credentials: Vec::new(),
            user_verification_required: false,
            extensions: None,
            state: AssertionState::Stub {
                challenge: Base64UrlSafeData::from(vec![9u8; 32]),
                allowed: Vec::new(),
            },
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_redis_challenge_lifecycle() {
        let store = RedisChallengeStore::new("redis://127.0.0.1:6379")
            .await
            .expect("Failed to create store");

        let fp = RequesterFingerprint::from_identity("redis-lifecycle");

        store
            .put(&fp, challenge(Duration::minutes(5)), Duration::minutes(5))
            .await
            .expect("Failed to store challenge");

        let consumed = store.take(&fp).await.expect("Failed to consume challenge");
        assert!(consumed.is_some());

        // Single-use: second take must come up empty.
        let second = store.take(&fp).await.expect("Failed on second consume");
        assert!(second.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_redis_challenge_expiration() {
        let store = RedisChallengeStore::new("redis://127.0.0.1:6379")
            .await
            .expect("Failed to create store");

        let fp = RequesterFingerprint::from_identity("redis-expiry");

        store
            .put(&fp, challenge(Duration::seconds(1)), Duration::seconds(1))
            .await
            .expect("Failed to store challenge");

        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;

        assert!(store.take(&fp).await.expect("Failed to consume").is_none());
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_redis_overwrite_on_reissue() {
        let store = RedisChallengeStore::new("redis://127.0.0.1:6379")
            .await
            .expect("Failed to create store");

        let fp = RequesterFingerprint::from_identity("redis-overwrite");

        let first = challenge(Duration::minutes(5));
        let mut second = challenge(Duration::minutes(5));
        second.challenge = Base64UrlSafeData::from(vec![8u8; 32]);

        store
            .put(&fp, first, Duration::minutes(5))
            .await
            .expect("Failed to store first");
        store
            .put(&fp, second, Duration::minutes(5))
            .await
            .expect("Failed to store second");

        let taken = store
            .take(&fp)
            .await
            .expect("Failed to consume")
            .expect("Challenge missing");
        assert_eq!(taken.challenge, Base64UrlSafeData::from(vec![8u8; 32]));
    }
}
