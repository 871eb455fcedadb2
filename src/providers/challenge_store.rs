//! Challenge storage trait.
//!
//! Stores outstanding assertion challenges with expiration and atomic
//! consumption.
//!
//! # Security
//!
//! Challenges must be:
//! - **Single-use**: consumed atomically to prevent replay attacks
//! - **Ephemeral**: expire after the configured TTL
//! - **Scoped**: one live challenge per requester fingerprint; issuing a new
//!   one silently replaces any unconsumed predecessor

use crate::challenge::StoredChallenge;
use crate::error::Result;
use crate::fingerprint::RequesterFingerprint;
use chrono::Duration;

/// Keyed, transient challenge storage.
///
/// # Contract
///
/// - `put` overwrites any existing entry for the fingerprint
///   (last-write-wins).
/// - `take` is atomic read-then-delete: among N concurrent `take`s for the
///   same key, at most one observes the challenge. The entry is gone
///   afterwards whether or not verification later succeeds, which closes the
///   replay window even on failed validations.
/// - Entries auto-expire after `ttl` regardless of explicit deletion.
/// - A missing entry is `Ok(None)`, never an error; errors are reserved for
///   storage failures.
pub trait ChallengeStore: Send + Sync {
    /// Store a challenge for the fingerprint, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn put(
        &self,
        fingerprint: &RequesterFingerprint,
        challenge: StoredChallenge,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Peek at the pending challenge without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn get(
        &self,
        fingerprint: &RequesterFingerprint,
    ) -> impl std::future::Future<Output = Result<Option<StoredChallenge>>> + Send;

    /// Consume the pending challenge atomically (single-use).
    ///
    /// Returns `Some` only for the first caller; the entry is removed even
    /// when the subsequent verification fails.
    ///
    /// # Errors
    ///
    /// Returns an error only on storage failures, not for missing or expired
    /// challenges.
    fn take(
        &self,
        fingerprint: &RequesterFingerprint,
    ) -> impl std::future::Future<Output = Result<Option<StoredChallenge>>> + Send;

    /// Drop the pending challenge, if any (cleanup or cancellation).
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails (not found is OK).
    fn delete(
        &self,
        fingerprint: &RequesterFingerprint,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
