//! User onboarding and lookup.

use claimledger_state::EntityStore;
use claimledger_types::{Credentials, User};
use serde::{Deserialize, Serialize};

use super::respond;
use crate::{args, dispatch::Invocation, error::Result};

#[derive(Debug, Default, Deserialize)]
struct UserLookup {
    #[serde(default)]
    username: String,
}

#[derive(Debug, Serialize)]
struct UserInfo {
    username: String,
    first_name: String,
    last_name: String,
}

/// Writes `user` unless a user with the same username already exists, and
/// returns the stored user either way.
///
/// Relies on invocation atomicity: the check and the write happen in one
/// transaction.
pub(crate) fn get_or_create(inv: &mut Invocation<'_>, user: User) -> Result<User> {
    let attrs = [user.username.as_str()];
    if let Some(existing) = EntityStore::get::<User, _>(inv.ledger(), &attrs)? {
        return Ok(existing);
    }
    EntityStore::put(inv.ledger_mut(), &attrs, &user)?;
    tracing::debug!(username = %user.username, "Created user");
    Ok(user)
}

/// Creates a user if absent.
///
/// Always answers with the stored credentials, so repeated calls for one
/// username return the same pair.
pub(crate) fn create(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let user: User = args::single(args)?;
    respond(&get_or_create(inv, user)?.credentials())
}

/// Checks a username/password pair. Answers `true` or `false`.
pub(crate) fn authenticate(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let credentials: Credentials = args::single(args)?;
    let user = EntityStore::get::<User, _>(inv.ledger(), &[credentials.username.as_str()])?;
    let authenticated = user.is_some_and(|user| user.password == credentials.password);
    respond(&authenticated)
}

/// Returns a user's public profile.
pub(crate) fn get_info(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let lookup: UserLookup = args::single(args)?;
    let user: User =
        EntityStore::require(inv.ledger(), &[lookup.username.as_str()], "User not found")?;
    respond(&UserInfo {
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
    })
}
