use crate::{
    auth::{client::WorkspaceClient, session::AccessTokenPair},
    utils::from_env::{EnvItemInfo, FromEnv, FromEnvErr, FromEnvVar},
};
use oauth2::{ClientId, ClientSecret};
use std::collections::HashSet;
use url::Url;

// Environment variable names for configuration
pub(crate) const OAUTH_KEY: &str = "WORKSPACE_OAUTH_KEY";
pub(crate) const OAUTH_SECRET: &str = "WORKSPACE_OAUTH_SECRET";
pub(crate) const API_URL: &str = "WORKSPACE_API_URL";

pub(crate) const ADMIN_TEAMS: &str = "WORKSPACE_AUTH_ADMIN_TEAMS";
pub(crate) const SUPERUSER_TEAMS: &str = "WORKSPACE_AUTH_SUPERUSER_TEAMS";
pub(crate) const ALLOWED_TEAMS: &str = "WORKSPACE_AUTH_ALLOWED_TEAMS";
pub(crate) const ADMINS: &str = "WORKSPACE_AUTH_ADMINS";
pub(crate) const SUPERUSERS: &str = "WORKSPACE_AUTH_SUPERUSERS";
pub(crate) const ALLOWED_USERS: &str = "WORKSPACE_AUTH_ALLOWED_USERS";

const DEFAULT_API_URL: &str = "https://api.workspace.example/";

static OAUTH_KEY_INFO: EnvItemInfo = EnvItemInfo {
    var: OAUTH_KEY,
    description: "OAuth application key identifying this integration to the workspace API",
    optional: false,
};

static OAUTH_SECRET_INFO: EnvItemInfo = EnvItemInfo {
    var: OAUTH_SECRET,
    description: "OAuth application secret paired with the application key",
    optional: false,
};

static API_URL_INFO: EnvItemInfo = EnvItemInfo {
    var: API_URL,
    description: "Base URL of the workspace API",
    optional: true,
};

/// Possible errors when loading the OAuth application configuration.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum OAuthConfigError {
    /// Error parsing the API base URL.
    #[error("error reading API base URL: {0}")]
    ApiUrl(#[from] url::ParseError),
}

/// Application-level OAuth credentials and the API endpoint they belong to.
///
/// These identify the integrating application to the remote workspace API,
/// independent of any end user. Loading fails fast when either credential is
/// missing; there is no degraded mode without application credentials.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    key: ClientId,
    secret: ClientSecret,
    api_url: Url,
}

impl OAuthConfig {
    /// Create a new config from explicit values.
    pub fn new(key: impl Into<String>, secret: impl Into<String>, api_url: Url) -> Self {
        Self {
            key: ClientId::new(key.into()),
            secret: ClientSecret::new(secret.into()),
            api_url,
        }
    }

    /// The OAuth application key.
    pub const fn key(&self) -> &ClientId {
        &self.key
    }

    /// The OAuth application secret.
    pub const fn secret(&self) -> &ClientSecret {
        &self.secret
    }

    /// The API base URL.
    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Build a [`WorkspaceClient`] bound to these application credentials
    /// and, if given, to the user token pair.
    pub fn client(&self, token: Option<AccessTokenPair>) -> WorkspaceClient {
        WorkspaceClient::new(self, token)
    }
}

impl FromEnv for OAuthConfig {
    type Error = OAuthConfigError;

    fn inventory() -> Vec<&'static EnvItemInfo> {
        vec![&OAUTH_KEY_INFO, &OAUTH_SECRET_INFO, &API_URL_INFO]
    }

    fn from_env() -> Result<Self, FromEnvErr<Self::Error>> {
        let key = String::from_env_var(OAUTH_KEY)
            .map_err(FromEnvErr::infallible_into::<OAuthConfigError>)?;
        let secret = String::from_env_var(OAUTH_SECRET)
            .map_err(FromEnvErr::infallible_into::<OAuthConfigError>)?;
        let api_url = Option::<Url>::from_env_var(API_URL)
            .map_err(|e| e.map(OAuthConfigError::ApiUrl))?
            .unwrap_or_else(|| {
                // The fallback is a compile-time constant.
                Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
            });

        Ok(Self::new(key, secret, api_url))
    }
}

/// Allow-lists that drive account permission derivation.
///
/// All six lists are optional and default to empty. Team lists are matched
/// against the remote team names a user belongs to; user lists are matched
/// against the local username.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionConfig {
    admin_teams: HashSet<String>,
    superuser_teams: HashSet<String>,
    allowed_teams: HashSet<String>,
    admins: HashSet<String>,
    superusers: HashSet<String>,
    allowed_users: HashSet<String>,
}

macro_rules! with_list {
    ($($(#[$attr:meta])* $with:ident => $field:ident),* $(,)?) => {
        $(
            $(#[$attr])*
            pub fn $with<I, S>(mut self, names: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.$field = names.into_iter().map(Into::into).collect();
                self
            }
        )*
    };
}

impl PermissionConfig {
    /// Create an empty config. With no allow-lists set, every recomputation
    /// strips all three flags.
    pub fn new() -> Self {
        Self::default()
    }

    with_list! {
        /// Set the teams whose members get the staff flag.
        with_admin_teams => admin_teams,
        /// Set the teams whose members get the superuser flag.
        with_superuser_teams => superuser_teams,
        /// Set the teams whose members get the active flag.
        with_allowed_teams => allowed_teams,
        /// Set the usernames that get the staff flag.
        with_admins => admins,
        /// Set the usernames that get the superuser flag.
        with_superusers => superusers,
        /// Set the usernames that get the active flag.
        with_allowed_users => allowed_users,
    }

    /// Teams whose members get the staff flag.
    pub const fn admin_teams(&self) -> &HashSet<String> {
        &self.admin_teams
    }

    /// Teams whose members get the superuser flag.
    pub const fn superuser_teams(&self) -> &HashSet<String> {
        &self.superuser_teams
    }

    /// Teams whose members get the active flag.
    pub const fn allowed_teams(&self) -> &HashSet<String> {
        &self.allowed_teams
    }

    /// Usernames that get the staff flag.
    pub const fn admins(&self) -> &HashSet<String> {
        &self.admins
    }

    /// Usernames that get the superuser flag.
    pub const fn superusers(&self) -> &HashSet<String> {
        &self.superusers
    }

    /// Usernames that get the active flag.
    pub const fn allowed_users(&self) -> &HashSet<String> {
        &self.allowed_users
    }
}

/// Split a comma-separated env var into a name set. Missing vars and empty
/// segments contribute nothing.
fn name_set(var: &str) -> HashSet<String> {
    match std::env::var(var) {
        Ok(s) => s
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect(),
        Err(_) => HashSet::new(),
    }
}

macro_rules! list_info {
    ($name:ident, $var:ident, $desc:literal) => {
        static $name: EnvItemInfo = EnvItemInfo {
            var: $var,
            description: $desc,
            optional: true,
        };
    };
}

list_info!(
    ADMIN_TEAMS_INFO,
    ADMIN_TEAMS,
    "Comma-separated team names granting the staff flag"
);
list_info!(
    SUPERUSER_TEAMS_INFO,
    SUPERUSER_TEAMS,
    "Comma-separated team names granting the superuser flag"
);
list_info!(
    ALLOWED_TEAMS_INFO,
    ALLOWED_TEAMS,
    "Comma-separated team names granting the active flag"
);
list_info!(
    ADMINS_INFO,
    ADMINS,
    "Comma-separated usernames granting the staff flag"
);
list_info!(
    SUPERUSERS_INFO,
    SUPERUSERS,
    "Comma-separated usernames granting the superuser flag"
);
list_info!(
    ALLOWED_USERS_INFO,
    ALLOWED_USERS,
    "Comma-separated usernames granting the active flag"
);

impl FromEnv for PermissionConfig {
    type Error = std::convert::Infallible;

    fn inventory() -> Vec<&'static EnvItemInfo> {
        vec![
            &ADMIN_TEAMS_INFO,
            &SUPERUSER_TEAMS_INFO,
            &ALLOWED_TEAMS_INFO,
            &ADMINS_INFO,
            &SUPERUSERS_INFO,
            &ALLOWED_USERS_INFO,
        ]
    }

    fn from_env() -> Result<Self, FromEnvErr<Self::Error>> {
        Ok(Self {
            admin_teams: name_set(ADMIN_TEAMS),
            superuser_teams: name_set(SUPERUSER_TEAMS),
            allowed_teams: name_set(ALLOWED_TEAMS),
            admins: name_set(ADMINS),
            superusers: name_set(SUPERUSERS),
            allowed_users: name_set(ALLOWED_USERS),
        })
    }
}
