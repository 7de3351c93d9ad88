//! Per-request client for the workspace HR API.
//!
//! A [`WorkspaceClient`] always carries the application credentials from
//! [`OAuthConfig`] and may additionally be bound to one user's
//! [`AccessTokenPair`]. Clients are cheap to build and meant to be created
//! fresh per logical operation; nothing is pooled or cached at this layer.

use crate::auth::{config::OAuthConfig, session::AccessTokenPair};
use oauth2::{ClientId, ClientSecret};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{instrument, warn};

const USERS_ME: &str = "hr/v2/users/me";
const TEAMS: &str = "hr/v2/teams";

/// Errors surfaced by API calls.
///
/// Configuration problems never show up here; they are caught when the
/// [`OAuthConfig`] is loaded.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The remote rejected the bound token pair.
    #[error("access token rejected by the workspace API")]
    Forbidden,

    /// Network-level failure reaching the remote.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The endpoint path did not join onto the API base URL.
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

/// The authenticated user's profile, as returned by the workspace API.
///
/// The remote contract is loose, so field access is dynamic: callers pick
/// out the keys they need and decide how hard to fail when one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    /// Get a string field by key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// The account status reported by the remote, if any.
    pub fn status(&self) -> Option<&str> {
        self.get_str("status")
    }

    /// Whether the remote reports the account as active. Any other status,
    /// or a missing one, counts as inactive.
    pub fn is_active(&self) -> bool {
        self.status() == Some("active")
    }
}

impl From<Map<String, Value>> for Profile {
    fn from(inner: Map<String, Value>) -> Self {
        Self(inner)
    }
}

/// A client for the workspace HR API, bound to the application credentials
/// and, optionally, to one user's token pair.
#[derive(Clone)]
pub struct WorkspaceClient {
    key: ClientId,
    secret: ClientSecret,
    api_url: url::Url,
    token: Option<AccessTokenPair>,
    http: reqwest::Client,
}

impl core::fmt::Debug for WorkspaceClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorkspaceClient")
            .field("key", &self.key)
            .field("api_url", &self.api_url.as_str())
            .field("user_authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl WorkspaceClient {
    /// Create a new client. No network I/O happens here; the token pair is
    /// only bound for later requests.
    pub fn new(config: &OAuthConfig, token: Option<AccessTokenPair>) -> Self {
        // NB: this is MANDATORY
        // https://docs.rs/oauth2/latest/oauth2/#security-warning
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            key: config.key().clone(),
            secret: config.secret().clone(),
            api_url: config.api_url().clone(),
            token,
            http,
        }
    }

    /// Whether a user token pair is bound to this client.
    pub const fn is_user_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The bound user token pair, if any.
    pub const fn token(&self) -> Option<&AccessTokenPair> {
        self.token.as_ref()
    }

    /// Fetch the authenticated user's profile.
    #[instrument(skip_all)]
    pub async fn current_user(&self) -> Result<Profile, ClientError> {
        let value = self.get_json(USERS_ME).await?;
        let profile = value
            .as_object()
            .cloned()
            .ok_or_else(|| ClientError::Malformed("profile response is not a JSON object".into()))?;
        Ok(profile.into())
    }

    /// Fetch the names of the teams the authenticated user belongs to.
    #[instrument(skip_all)]
    pub async fn current_teams(&self) -> Result<Vec<String>, ClientError> {
        let value = self.get_json(TEAMS).await?;
        let teams = value
            .as_array()
            .ok_or_else(|| ClientError::Malformed("teams response is not a JSON array".into()))?;

        teams
            .iter()
            .map(|team| {
                team.get("name")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        ClientError::Malformed("team entry is missing a name".into())
                    })
            })
            .collect()
    }

    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let url = self.api_url.join(path)?;

        let request = self
            .http
            .get(url)
            .query(&[("client_id", self.key.as_str())]);

        // User-bound clients act as the user; bare clients still present the
        // application credentials.
        let request = match &self.token {
            Some(pair) => request.bearer_auth(pair.token().secret()),
            None => request.basic_auth(self.key.as_str(), Some(self.secret.secret())),
        };

        let response = request
            .send()
            .await
            .inspect_err(|e| warn!(%e, "failed to reach the workspace API"))
            .map_err(ClientError::Transport)?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(ClientError::Forbidden);
        }

        let response = response
            .error_for_status()
            .map_err(ClientError::Transport)?;

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                ClientError::Malformed(e.to_string())
            } else {
                ClientError::Transport(e)
            }
        })
    }
}
