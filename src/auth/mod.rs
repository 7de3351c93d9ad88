pub(crate) mod client;
pub use client::{ClientError, Profile, WorkspaceClient};

pub(crate) mod config;
pub use config::{OAuthConfig, OAuthConfigError, PermissionConfig};

pub(crate) mod login;
pub use login::{check_login, LoginCheck};

pub(crate) mod middleware;
pub use middleware::{ClientAttachLayer, ClientAttachService, ClientNotAttached};

pub(crate) mod perms;
pub use perms::update_user_permissions;

pub(crate) mod session;
pub use session::{AccessTokenPair, Session, ACCESS_TOKEN_KEY};

pub(crate) mod user;
pub use user::{set_user_info, MemoryUserStore, SetUserInfoError, UserRecord, UserStore};
