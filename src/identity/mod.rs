//! Stable logger identities.
//!
//! # Data Flow
//! ```text
//! LoggerSpec (as given by the caller)
//!     → canonical JSON (insertion order, compact)
//!     → SHA-256 digest
//!     → "CEDAR_" + first 8 hex chars
//!     → Identity (shared by the coordinator and every worker)
//! ```
//!
//! # Design Decisions
//! - No handshake: both sides derive the same identity from the same spec
//! - Fixed width so the wire framing can slice it without escaping
//! - Collisions are accepted as rare; nothing defends against them

use std::fmt;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::spec::LoggerSpec;

/// Namespace tag prepended to every identity.
pub const NAMESPACE: &str = "CEDAR_";

/// Number of hex digest characters kept after the namespace.
pub const DIGEST_CHARS: usize = 8;

/// Total identity width in bytes.
pub const IDENTITY_LEN: usize = NAMESPACE.len() + DIGEST_CHARS;

/// Errors produced when building an identity from untrusted text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity must be {expected} characters, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("identity must be ASCII and must not contain '['")]
    InvalidCharacter,
}

/// Deterministic identifier of a logger group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    /// Validate an identity received from outside the crate.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let value = value.into();
        if !value.is_ascii() || value.contains('[') {
            return Err(IdentityError::InvalidCharacter);
        }
        if value.len() != IDENTITY_LEN {
            return Err(IdentityError::Length {
                expected: IDENTITY_LEN,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }

    /// Wrap whatever a decoder sliced off the wire. Never fails; an invalid
    /// identity simply matches no registry entry.
    pub(crate) fn from_wire(value: &str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the identity of a logger spec.
///
/// Structurally equal specs (same transports, options and order, including
/// option key order) always produce the same identity.
pub fn derive_identity(spec: &LoggerSpec) -> Identity {
    let canonical = spec.canonical_json();
    let digest = Sha256::digest(canonical.as_bytes());
    let hex = hex::encode(digest);
    Identity(format!("{}{}", NAMESPACE, &hex[..DIGEST_CHARS]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> LoggerSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn identity_has_fixed_width_and_namespace() {
        let id = derive_identity(&spec(json!(["console"])));
        assert_eq!(id.as_str().len(), IDENTITY_LEN);
        assert!(id.as_str().starts_with(NAMESPACE));
        assert!(!id.as_str().contains('['));
    }

    #[test]
    fn equal_specs_share_identity() {
        let a = spec(json!(["console", {"transport": "file", "path": "a.log"}]));
        let b = spec(json!(["console", {"transport": "file", "path": "a.log"}]));
        assert_eq!(derive_identity(&a), derive_identity(&b));
    }

    #[test]
    fn option_value_changes_identity() {
        let a = spec(json!([{"transport": "file", "path": "a.log"}]));
        let b = spec(json!([{"transport": "file", "path": "b.log"}]));
        assert_ne!(derive_identity(&a), derive_identity(&b));
    }

    #[test]
    fn order_changes_identity() {
        let a = spec(json!(["console", "file"]));
        let b = spec(json!(["file", "console"]));
        assert_ne!(derive_identity(&a), derive_identity(&b));
    }

    #[test]
    fn digest_matches_sha256_of_canonical_json() {
        // sha256(`["console"]`)
        let expected = {
            let digest = Sha256::digest(br#"["console"]"#);
            format!("CEDAR_{}", &hex::encode(digest)[..8])
        };
        assert_eq!(derive_identity(&spec(json!(["console"]))).as_str(), expected);
    }

    #[test]
    fn new_rejects_bad_identities() {
        assert_eq!(
            Identity::new("CEDAR_1"),
            Err(IdentityError::Length { expected: 14, actual: 7 })
        );
        assert_eq!(Identity::new("CEDAR_abcd[234"), Err(IdentityError::InvalidCharacter));
        assert!(Identity::new("CEDAR_abcd1234").is_ok());
    }
}
