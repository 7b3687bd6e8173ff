//! Character Roles
//!
//! One networked character exists per participant. The process that owns
//! a character runs it as a [`local::LocalAuthorityController`]; every
//! other process runs a [`remote::RemoteProxyController`] for it. The
//! role is chosen once at spawn and never changes.

pub mod config;
pub mod controller;
pub mod headbob;
pub mod input;
pub mod local;
pub mod physics;
pub mod pose;
pub mod remote;

use serde::{Deserialize, Serialize};

/// Unique player identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(*uuid::Uuid::new_v4().as_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Short hex prefix for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_uuid_roundtrip() {
        let id = PlayerId::random();
        let s = id.to_uuid_string();
        assert_eq!(PlayerId::from_uuid_str(&s), Some(id));
    }

    #[test]
    fn test_player_id_short() {
        let id = PlayerId::new([0xab; 16]);
        assert_eq!(id.short(), "abababab");
    }
}
