//! Login verification.

use crate::auth::{
    client::{ClientError, Profile},
    config::OAuthConfig,
    session::AccessTokenPair,
};
use tracing::{instrument, warn};

/// Outcome of verifying a stored token pair against the workspace API.
///
/// Every expected failure mode folds into a variant here; callers never need
/// to handle errors for the normal bad-login paths. The message strings are
/// stable and surfaced to operators as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginCheck {
    /// The token is valid and the remote account is active.
    Valid(Profile),
    /// The remote rejected the token pair.
    InvalidToken,
    /// Network-level failure reaching the remote.
    NetworkError,
    /// The response did not decode into a profile object.
    ValueError,
    /// The token is valid but the remote account is not active.
    Inactive,
}

impl LoginCheck {
    /// Whether the login is good.
    pub const fn ok(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Human-readable reason for the outcome.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Valid(_) => "OK",
            Self::InvalidToken => "Invalid access token",
            Self::NetworkError => "Network error",
            Self::ValueError => "Value error",
            Self::Inactive => "User is inactive",
        }
    }

    /// The outcome as a `(ok, message)` pair.
    pub const fn as_tuple(&self) -> (bool, &'static str) {
        (self.ok(), self.message())
    }

    /// The fetched profile, when the login is good.
    pub const fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Valid(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Verify that the token pair is valid and the remote account is active.
///
/// Builds a fresh single-use client bound to the token and makes one
/// profile fetch. Authorization failure is classified before any status
/// inspection; transport and decode failures short-circuit and are logged
/// for diagnostics. On success the fetched profile rides along in
/// [`LoginCheck::Valid`] so callers can feed it straight into
/// [`set_user_info`].
///
/// [`set_user_info`]: crate::auth::set_user_info
#[instrument(skip_all)]
pub async fn check_login(config: &OAuthConfig, token: &AccessTokenPair) -> LoginCheck {
    let client = config.client(Some(token.clone()));

    let profile = match client.current_user().await {
        Ok(profile) => profile,
        Err(ClientError::Forbidden) => return LoginCheck::InvalidToken,
        Err(err @ (ClientError::Transport(_) | ClientError::Url(_))) => {
            warn!(%err, "network failure while verifying login");
            return LoginCheck::NetworkError;
        }
        Err(err @ ClientError::Malformed(_)) => {
            warn!(%err, "unexpected profile response while verifying login");
            return LoginCheck::ValueError;
        }
    };

    if !profile.is_active() {
        return LoginCheck::Inactive;
    }

    LoginCheck::Valid(profile)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn legacy_tuples() {
        assert_eq!(
            LoginCheck::Valid(Profile::default()).as_tuple(),
            (true, "OK")
        );
        assert_eq!(
            LoginCheck::InvalidToken.as_tuple(),
            (false, "Invalid access token")
        );
        assert_eq!(LoginCheck::NetworkError.as_tuple(), (false, "Network error"));
        assert_eq!(LoginCheck::ValueError.as_tuple(), (false, "Value error"));
        assert_eq!(LoginCheck::Inactive.as_tuple(), (false, "User is inactive"));
    }

    #[test]
    fn profile_only_on_success() {
        assert!(LoginCheck::Valid(Profile::default()).profile().is_some());
        assert!(LoginCheck::Inactive.profile().is_none());
    }
}
