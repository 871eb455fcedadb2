//! Relying-party configuration.
//!
//! Configuration values should be provided by the application, not hardcoded.
//! The relying party is a named struct with explicit fields; there is no
//! positional construction anywhere.

use chrono::Duration;

/// Resident-key (userless / discoverable) policy for login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserlessPolicy {
    /// Userless login is not offered.
    #[default]
    Disabled,

    /// Authenticators are asked not to use discoverable credentials.
    Discouraged,

    /// Discoverable credentials are preferred when available.
    Preferred,

    /// Discoverable credentials are required.
    Required,
}

/// WebAuthn assertion configuration.
///
/// Challenge byte-length and the accepted COSE signature algorithms are not
/// configurable here: the protocol engine fixes both when it starts a
/// ceremony, so there is no knob for them in this crate.
#[derive(Debug, Clone)]
pub struct WebAuthnConfig {
    /// Relying Party ID (e.g., "app.example.com").
    ///
    /// Must be a valid domain. Usually the domain portion of the origin.
    pub rp_id: String,

    /// Human-readable Relying Party name shown by authenticators.
    pub rp_name: String,

    /// Expected origin for WebAuthn (e.g., "https://app.example.com").
    ///
    /// Must match the origin in the client-side WebAuthn call.
    pub origin: String,

    /// How long an issued challenge stays valid.
    ///
    /// Default: 60 seconds
    pub challenge_ttl: Duration,

    /// Require user verification on every login, regardless of policy.
    ///
    /// Default: false
    pub login_verify: bool,

    /// Userless (discoverable credential) policy.
    ///
    /// Default: disabled
    pub userless: UserlessPolicy,
}

impl WebAuthnConfig {
    /// Create a new configuration for the given relying party.
    #[must_use]
    pub fn new(rp_id: impl Into<String>, rp_name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            rp_id: rp_id.into(),
            rp_name: rp_name.into(),
            origin: origin.into(),
            challenge_ttl: Duration::seconds(60),
            login_verify: false,
            userless: UserlessPolicy::Disabled,
        }
    }

    /// Set the challenge time-to-live.
    #[must_use]
    pub const fn with_challenge_ttl(mut self, ttl: Duration) -> Self {
        self.challenge_ttl = ttl;
        self
    }

    /// Require explicit user verification on login.
    #[must_use]
    pub const fn with_login_verify(mut self, verify: bool) -> Self {
        self.login_verify = verify;
        self
    }

    /// Set the userless (discoverable) policy.
    #[must_use]
    pub const fn with_userless(mut self, policy: UserlessPolicy) -> Self {
        self.userless = policy;
        self
    }

    /// Whether the authenticator must verify the user for a login to pass.
    ///
    /// True when explicitly configured, or when the userless policy is
    /// `Required` or `Preferred`.
    #[must_use]
    pub const fn user_verification_required(&self) -> bool {
        self.login_verify
            || matches!(
                self.userless,
                UserlessPolicy::Required | UserlessPolicy::Preferred
            )
    }

    /// Challenge validity window in milliseconds, as sent in request options.
    #[must_use]
    pub fn timeout_ms(&self) -> u32 {
        u32::try_from(self.challenge_ttl.num_milliseconds()).unwrap_or(u32::MAX)
    }
}

impl Default for WebAuthnConfig {
    fn default() -> Self {
        Self::new("localhost", "Development", "http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WebAuthnConfig::new("example.com", "Example", "https://example.com")
            .with_challenge_ttl(Duration::seconds(30))
            .with_login_verify(true)
            .with_userless(UserlessPolicy::Discouraged);

        assert_eq!(config.rp_id, "example.com");
        assert_eq!(config.origin, "https://example.com");
        assert_eq!(config.challenge_ttl, Duration::seconds(30));
        assert_eq!(config.timeout_ms(), 30_000);
        assert!(config.login_verify);
    }

    #[test]
    fn test_user_verification_from_login_verify() {
        let config = WebAuthnConfig::default().with_login_verify(true);
        assert!(config.user_verification_required());
    }

    #[test]
    fn test_user_verification_from_userless_policy() {
        let config = WebAuthnConfig::default().with_userless(UserlessPolicy::Preferred);
        assert!(config.user_verification_required());

        let config = WebAuthnConfig::default().with_userless(UserlessPolicy::Required);
        assert!(config.user_verification_required());

        let config = WebAuthnConfig::default().with_userless(UserlessPolicy::Discouraged);
        assert!(!config.user_verification_required());
    }

    #[test]
    fn test_default_config() {
        let config = WebAuthnConfig::default();
        assert_eq!(config.rp_id, "localhost");
        assert_eq!(config.challenge_ttl, Duration::seconds(60));
        assert!(!config.user_verification_required());
    }
}
