//! Session-token OAuth client wiring and team-based account permissions for
//! axum services.
//!
//! This crate glues three external collaborators together:
//!
//! - a session layer that stores a user's OAuth access token pair under a
//!   fixed key,
//! - the remote workspace HR API, reached through a per-request
//!   [`WorkspaceClient`],
//! - the hosting application's account storage, reached through the
//!   [`UserStore`] seam.
//!
//! The [`ClientAttachLayer`] middleware binds a client to every inbound
//! request. At login time, [`check_login`] verifies a token pair with a
//! single profile fetch, and the [`set_user_info`] and
//! [`update_user_permissions`] helpers copy profile data and team-derived
//! permission flags onto the local [`UserRecord`].
//!
//! [`WorkspaceClient`]: crate::auth::WorkspaceClient
//! [`UserStore`]: crate::auth::UserStore
//! [`ClientAttachLayer`]: crate::auth::ClientAttachLayer
//! [`check_login`]: crate::auth::check_login
//! [`set_user_info`]: crate::auth::set_user_info
//! [`update_user_permissions`]: crate::auth::update_user_permissions
//! [`UserRecord`]: crate::auth::UserRecord

#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

/// Authentication, permissioning, and the request middleware.
pub mod auth;

/// Shared utilities: env-based configuration loading and tracing setup.
pub mod utils;

/// Re-exports of common dependencies, so that downstream binaries do not
/// need to declare them directly.
pub mod deps {
    pub use axum;
    pub use oauth2;
    pub use reqwest;
    pub use serde_json;
    pub use tracing;
    pub use tracing_subscriber;
    pub use url;
}
