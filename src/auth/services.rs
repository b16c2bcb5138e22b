use sqlx::PgPool;
use tracing::warn;

use super::password::{hash_password, verify_password};
use super::repo_types::User;

pub const MISSING_CREDENTIALS: &str = "Missing username or password";
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const INVALID_LOGIN: &str = "Invalid login";

/// `None` when the username is already taken.
pub async fn register(db: &PgPool, username: &str, password: &str) -> anyhow::Result<Option<User>> {
    let hash = hash_password(password)?;
    User::create(db, username, &hash).await
}

/// The user whose password matches, `None` for unknown users and bad passwords alike.
pub async fn authenticate(
    db: &PgPool,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let Some(user) = User::find_by_username(db, username).await? else {
        warn!(%username, "login unknown username");
        return Ok(None);
    };
    if !verify_password(password, &user.password_hash)? {
        warn!(%username, user_id = user.id, "login invalid password");
        return Ok(None);
    }
    Ok(Some(user))
}
