//! Collaborator interfaces for the assertion pipeline.
//!
//! These traits define every external dependency the issuer and validator
//! touch. Components receive concrete implementations at construction; there
//! is no ambient registry.
//!
//! - **Testing**: mocks in [`crate::mocks`] (in-memory, deterministic)
//! - **Production**: [`WebauthnVerifier`] over `webauthn-rs`, the Redis
//!   challenge store in [`crate::stores`], and an application-provided
//!   credential repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use webauthn_rs::prelude::Base64UrlSafeData;

pub mod challenge_store;
pub mod credentials;
pub mod verifier;
pub mod webauthn;

pub use challenge_store::ChallengeStore;
pub use credentials::CredentialRepository;
pub use verifier::{AssertionVerifier, VerifiedAssertion};
pub use webauthn::WebauthnVerifier;

/// A registered passkey credential, as the application persists it.
///
/// `public_key` holds the protocol engine's serialized credential record
/// (a `webauthn_rs::prelude::Passkey` encoded as JSON); this crate never
/// interprets the key material itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasskeyCredential {
    /// Credential ID (unique).
    pub credential_id: Base64UrlSafeData,

    /// Owning user's WebAuthn handle.
    pub user_id: Uuid,

    /// Serialized engine credential record.
    pub public_key: Vec<u8>,

    /// Signature counter at last use (replay protection).
    pub counter: u32,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,

    /// Last used timestamp.
    pub last_used: Option<DateTime<Utc>>,
}
