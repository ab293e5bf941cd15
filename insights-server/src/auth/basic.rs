//! HTTP Basic credential handling
//!
//! The server carries a single shared credential pair from the environment.
//! Presented values are compared against it as SHA-256 digests in constant
//! time, so neither content nor length leaks through timing.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ring::constant_time::verify_slices_are_equal;
use ring::digest::{SHA256, digest};

/// The configured shared credential pair
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// True when either side of the configured pair is empty
    pub fn is_incomplete(&self) -> bool {
        self.username.is_empty() || self.password.is_empty()
    }

    /// Constant-time check of a presented pair
    ///
    /// Username and password are both always verified before combining. An
    /// incomplete configured pair never matches, not even against an empty
    /// presented pair (fail closed).
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if self.is_incomplete() {
            return false;
        }
        let username_ok = digests_match(self.username.as_bytes(), username.as_bytes());
        let password_ok = digests_match(self.password.as_bytes(), password.as_bytes());
        username_ok & password_ok
    }
}

impl std::fmt::Debug for Credentials {
    // Never print the password, not even in debug output
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Compare two byte strings via their SHA-256 digests
///
/// Digests have a fixed length, so the comparison runs in constant time
/// regardless of input lengths.
fn digests_match(expected: &[u8], presented: &[u8]) -> bool {
    let expected = digest(&SHA256, expected);
    let presented = digest(&SHA256, presented);
    verify_slices_are_equal(expected.as_ref(), presented.as_ref()).is_ok()
}

/// A credential pair presented by a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Parse an `Authorization` header value of the form `Basic <base64(user:pass)>`
///
/// The scheme match is case-insensitive. Only the first colon separates
/// username from password, so passwords may contain colons. Any malformed
/// value yields `None`.
pub fn parse_basic_header(header: &str) -> Option<BasicCredentials> {
    let (scheme, payload) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(payload.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}
