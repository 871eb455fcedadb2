//! Credential repository trait.

use super::PasskeyCredential;
use crate::error::Result;
use uuid::Uuid;

/// Read access to a user's registered passkey credentials.
///
/// The backing storage engine is the application's concern; anything that
/// can answer "which credentials does this user hold" satisfies the
/// interface. Writes (registration, counter updates) happen outside this
/// crate.
pub trait CredentialRepository: Send + Sync {
    /// All credentials registered to the given user handle.
    ///
    /// An unknown user yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    fn credentials_for(
        &self,
        user: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<PasskeyCredential>>> + Send;
}
