use crate::db::{
    error::{Error, Result},
    types::User,
};
use deadpool_postgres::Pool;

/// Look up a user by username
pub async fn find_by_username(pool: &Pool, username: &str) -> Result<Option<User>> {
    let conn = pool.get().await?;

    let row = conn
        .query_opt(
            "SELECT id, username, password, role FROM users WHERE username = $1",
            &[&username],
        )
        .await?;

    Ok(row.as_ref().map(User::from_row))
}

/// Insert a user unless the username already exists
///
/// Returns `true` when a row was created.
pub async fn insert_if_absent(
    pool: &Pool,
    username: &str,
    password_hash: &str,
    role: &str,
) -> Result<bool> {
    let conn = pool.get().await?;

    let inserted = conn
        .execute(
            "INSERT INTO users (username, password, role) VALUES ($1, $2, $3)
             ON CONFLICT (username) DO NOTHING",
            &[&username, &password_hash, &role],
        )
        .await?;

    Ok(inserted == 1)
}

/// Replace a user's password digest
///
/// # Errors
///
/// * `Error::NotFoundError` - No user has this username
pub async fn update_password(pool: &Pool, username: &str, password_hash: &str) -> Result<()> {
    let conn = pool.get().await?;

    let updated = conn
        .execute(
            "UPDATE users SET password = $2 WHERE username = $1",
            &[&username, &password_hash],
        )
        .await?;

    if updated == 0 {
        return Err(Error::NotFoundError(format!("user '{}'", username)));
    }

    Ok(())
}
