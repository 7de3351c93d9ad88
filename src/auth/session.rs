//! Session-stored access tokens.
//!
//! The hosting application's session layer owns serialization and cookie
//! handling; this module only defines the fixed key the token pair lives
//! under and the extraction rules. A missing or malformed entry is never an
//! error, it just means the request is not user-authenticated.

use oauth2::AccessToken;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Fixed session key under which a logged-in user's token pair is stored,
/// as a two-element JSON string array.
pub const ACCESS_TOKEN_KEY: &str = "workspace_access_token";

/// Per-request session state, as deserialized by the hosting framework's
/// session layer and stashed in request extensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session(pub Map<String, Value>);

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the stored token pair, if present and well-formed.
    pub fn access_token(&self) -> Option<AccessTokenPair> {
        AccessTokenPair::from_session(Some(self))
    }

    /// Store a token pair under [`ACCESS_TOKEN_KEY`].
    pub fn set_access_token(&mut self, pair: &AccessTokenPair) {
        self.0.insert(
            ACCESS_TOKEN_KEY.to_owned(),
            json!([pair.token().secret(), pair.secret().secret()]),
        );
    }

    /// Remove the stored token pair, returning whether one was present.
    pub fn clear_access_token(&mut self) -> bool {
        self.0.remove(ACCESS_TOKEN_KEY).is_some()
    }
}

impl From<Map<String, Value>> for Session {
    fn from(inner: Map<String, Value>) -> Self {
        Self(inner)
    }
}

/// An OAuth user token pair: the access token and its token secret, issued
/// to act on behalf of a specific remote user.
///
/// Both halves are [`AccessToken`] newtypes, so accidental `Debug` output
/// stays redacted.
#[derive(Clone)]
pub struct AccessTokenPair {
    token: AccessToken,
    secret: AccessToken,
}

impl core::fmt::Debug for AccessTokenPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessTokenPair").finish_non_exhaustive()
    }
}

impl AccessTokenPair {
    /// Create a new token pair.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token.into()),
            secret: AccessToken::new(secret.into()),
        }
    }

    /// The access token.
    pub const fn token(&self) -> &AccessToken {
        &self.token
    }

    /// The token secret.
    pub const fn secret(&self) -> &AccessToken {
        &self.secret
    }

    /// Extract the token pair stored in the given session.
    ///
    /// Returns `None` when the session itself is absent, when nothing is
    /// stored under [`ACCESS_TOKEN_KEY`], or when the stored value is not a
    /// two-element string array. None of these are errors; they all mean
    /// "no prior login".
    pub fn from_session(session: Option<&Session>) -> Option<Self> {
        let parts = session?.0.get(ACCESS_TOKEN_KEY)?.as_array()?;
        if parts.len() != 2 {
            return None;
        }
        let token = parts[0].as_str()?;
        let secret = parts[1].as_str()?;
        Some(Self::new(token, secret))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_stored_pair() {
        let mut session = Session::new();
        session.set_access_token(&AccessTokenPair::new("abc", "xyz"));

        let pair = AccessTokenPair::from_session(Some(&session)).unwrap();
        assert_eq!(pair.token().secret(), "abc");
        assert_eq!(pair.secret().secret(), "xyz");
    }

    #[test]
    fn missing_session_is_no_token() {
        assert!(AccessTokenPair::from_session(None).is_none());
    }

    #[test]
    fn missing_key_is_no_token() {
        assert!(Session::new().access_token().is_none());
    }

    #[test]
    fn malformed_values_are_no_token() {
        let cases = [
            json!("abc"),
            json!(["abc"]),
            json!(["abc", "xyz", "extra"]),
            json!(["abc", 7]),
            json!([1, 2]),
            json!({"token": "abc"}),
            json!(null),
        ];

        for value in cases {
            let mut session = Session::new();
            session.0.insert(ACCESS_TOKEN_KEY.to_owned(), value.clone());
            assert!(
                session.access_token().is_none(),
                "expected no token for {value}"
            );
        }
    }

    #[test]
    fn clear_reports_presence() {
        let mut session = Session::new();
        assert!(!session.clear_access_token());

        session.set_access_token(&AccessTokenPair::new("abc", "xyz"));
        assert!(session.clear_access_token());
        assert!(session.access_token().is_none());
    }
}
