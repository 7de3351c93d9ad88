//! Team-based permission derivation.

use crate::auth::{
    config::PermissionConfig,
    user::{UserRecord, UserStore},
};
use std::collections::HashSet;
use tracing::debug;

fn intersects(teams: &HashSet<String>, allow: &HashSet<String>) -> bool {
    !teams.is_disjoint(allow)
}

/// Recompute the staff, superuser, and active flags from the user's current
/// team memberships and the configured allow-lists, then persist the record.
///
/// Flags are always derived from scratch, never merged with their previous
/// values. A team removal upstream therefore revokes whatever access that
/// team alone was granting. By construction, `is_active` holds whenever
/// `is_staff` or `is_superuser` does.
pub async fn update_user_permissions<I, S>(
    user: &mut UserRecord,
    teams: I,
    config: &PermissionConfig,
    store: &dyn UserStore,
) -> eyre::Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let teams: HashSet<String> = teams.into_iter().map(Into::into).collect();

    user.is_staff =
        intersects(&teams, config.admin_teams()) || config.admins().contains(&user.username);

    user.is_superuser = intersects(&teams, config.superuser_teams())
        || config.superusers().contains(&user.username);

    user.is_active = user.is_staff
        || user.is_superuser
        || config.allowed_users().contains(&user.username)
        || intersects(&teams, config.allowed_teams());

    debug!(
        username = %user.username,
        is_staff = user.is_staff,
        is_superuser = user.is_superuser,
        is_active = user.is_active,
        "recomputed account permissions"
    );

    store.save(user).await
}
