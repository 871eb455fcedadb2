//! Error types for assertion-challenge operations.

use thiserror::Error;

/// Result type alias for assertion-challenge operations.
pub type Result<T> = std::result::Result<T, AssertError>;

/// Infrastructure error taxonomy for the assertion pipeline.
///
/// Protocol-level rejections (no pending challenge, malformed submission,
/// failed verification) are **not** errors: the validator reports them as
/// [`crate::validator::AssertionOutcome::Rejected`] values so callers can
/// treat authentication failure as ordinary control flow. This enum covers
/// only the faults that mean the pipeline itself could not run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssertError {
    /// Relying-party configuration could not be turned into a protocol engine.
    #[error("invalid relying party configuration: {0}")]
    InvalidConfiguration(String),

    /// The challenge store could not be reached or refused the operation.
    #[error("challenge store error: {0}")]
    Store(String),

    /// A challenge or its engine state could not be (de)serialized.
    #[error("challenge serialization error: {0}")]
    Serialization(String),

    /// Credential lookup failed at the repository.
    #[error("credential lookup error: {0}")]
    CredentialLookup(String),

    /// A stored credential could not be decoded back into protocol form.
    #[error("stored credential is corrupt")]
    CredentialCorrupt,

    /// The protocol engine rejected the assertion.
    ///
    /// Carries the engine's diagnostic for internal logging. The validator
    /// converts this into a generic rejection; the detail must not be echoed
    /// to end users.
    #[error("assertion verification rejected: {0}")]
    VerificationRejected(String),
}

impl AssertError {
    /// Returns `true` if this error represents a verification rejection
    /// rather than an infrastructure fault.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::VerificationRejected(_))
    }
}
