//! Requester fingerprint derivation.
//!
//! A fingerprint scopes challenge issuance to one transport-level identity so
//! a challenge issued to one client can never validate a submission from
//! another. It is derived from non-secret request facts and carries no
//! authentication weight of its own.

use sha2::{Digest, Sha256};
use std::fmt;
use std::net::IpAddr;

/// Stable identity of the requesting client, used as the challenge store key.
///
/// Derived deterministically from the HTTP host and the client network
/// address, hashed so the key is uniform and opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RequesterFingerprint(String);

impl RequesterFingerprint {
    /// Derive a fingerprint from the request host and client address.
    #[must_use]
    pub fn new(host: &str, address: IpAddr) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(host.as_bytes());
        hasher.update(b"|");
        hasher.update(address.to_string().as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Build a fingerprint from an already-derived transport identity.
    ///
    /// For callers that key clients by something other than host + address
    /// (e.g., a session or connection id). The value is hashed the same way.
    #[must_use]
    pub fn from_identity(identity: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(identity.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// The hex digest backing this fingerprint.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequesterFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = RequesterFingerprint::new("app.example.com", IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)));
        let b = RequesterFingerprint::new("app.example.com", IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_varies_by_address() {
        let a = RequesterFingerprint::new("app.example.com", IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)));
        let b = RequesterFingerprint::new("app.example.com", IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8)));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_varies_by_host() {
        let addr = IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4));
        let a = RequesterFingerprint::new("app.example.com", addr);
        let b = RequesterFingerprint::new("other.example.com", addr);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_is_hex_digest() {
        let fp = RequesterFingerprint::new("host", IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
