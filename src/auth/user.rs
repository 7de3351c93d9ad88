//! Local account records and their persistence seam.

use crate::auth::client::Profile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// The locally persisted account record.
///
/// Owned by the hosting application's storage; this layer only mutates the
/// name, email, and permission fields and asks the [`UserStore`] to save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Login name, matched against the configured username allow-lists.
    pub username: String,
    /// First name, copied from the remote profile.
    pub first_name: String,
    /// Last name, copied from the remote profile.
    pub last_name: String,
    /// Email address, copied from the remote profile.
    pub email: String,
    /// Whether the account has staff access.
    pub is_staff: bool,
    /// Whether the account has superuser access.
    pub is_superuser: bool,
    /// Whether the account may log in at all.
    pub is_active: bool,
}

impl UserRecord {
    /// Create a record with the given username and everything else unset.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

/// Persistence seam for [`UserRecord`]s.
///
/// The hosting application owns the actual storage; this layer only calls
/// `save` after mutating a record.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist the record.
    async fn save(&self, user: &UserRecord) -> eyre::Result<()>;
}

/// An in-memory [`UserStore`], keyed by username. Intended for tests and
/// demo binaries.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    records: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a saved record by username.
    pub fn get(&self, username: &str) -> Option<UserRecord> {
        self.records.lock().unwrap().get(username).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn save(&self, user: &UserRecord) -> eyre::Result<()> {
        self.records
            .lock()
            .unwrap()
            .insert(user.username.clone(), user.clone());
        Ok(())
    }
}

/// Possible errors when copying profile data onto a record.
#[derive(Debug, thiserror::Error)]
pub enum SetUserInfoError {
    /// A required profile field is missing or not a string. A remote
    /// contract change should surface loudly rather than blank out local
    /// names.
    #[error("profile field {0:?} is missing or not a string")]
    MissingField(&'static str),

    /// The store failed to persist the record.
    #[error("failed to persist user record")]
    Store(#[source] eyre::Report),
}

fn required_str<'a>(profile: &'a Profile, key: &'static str) -> Result<&'a str, SetUserInfoError> {
    profile
        .get_str(key)
        .ok_or(SetUserInfoError::MissingField(key))
}

/// Copy the user's first name, last name, and email from the remote profile
/// onto the record, then persist it.
///
/// All three fields must be present; the record is left untouched and
/// nothing is saved when any of them is missing.
pub async fn set_user_info(
    user: &mut UserRecord,
    profile: &Profile,
    store: &dyn UserStore,
) -> Result<(), SetUserInfoError> {
    let first_name = required_str(profile, "first_name")?;
    let last_name = required_str(profile, "last_name")?;
    let email = required_str(profile, "email")?;

    user.first_name = first_name.to_owned();
    user.last_name = last_name.to_owned();
    user.email = email.to_owned();

    store.save(user).await.map_err(SetUserInfoError::Store)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn profile(value: serde_json::Value) -> Profile {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn copies_profile_fields_and_saves() {
        let store = MemoryUserStore::new();
        let mut user = UserRecord::new("ada");

        let profile = profile(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "status": "active",
        }));

        set_user_info(&mut user, &profile, &store).await.unwrap();

        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(store.get("ada").unwrap(), user);
    }

    #[tokio::test]
    async fn missing_field_is_an_error() {
        let store = MemoryUserStore::new();
        let mut user = UserRecord::new("ada");

        let no_email = profile(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
        }));

        let err = set_user_info(&mut user, &no_email, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, SetUserInfoError::MissingField("email")));

        // nothing copied, nothing saved
        assert_eq!(user, UserRecord::new("ada"));
        assert!(store.get("ada").is_none());
    }

    #[tokio::test]
    async fn non_string_field_is_an_error() {
        let store = MemoryUserStore::new();
        let mut user = UserRecord::new("ada");

        let bad = profile(json!({
            "first_name": 7,
            "last_name": "Lovelace",
            "email": "ada@example.com",
        }));

        let err = set_user_info(&mut user, &bad, &store).await.unwrap_err();
        assert!(matches!(err, SetUserInfoError::MissingField("first_name")));
    }
}
