use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::User};

use super::{check_exists, Lookup};

pub async fn get_users_in_db(pool: &SqlitePool) -> Result<Vec<User>, RequestError> {
    let users = sqlx::query_as::<Sqlite, User>("SELECT username, name, avatar_url FROM users")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn get_user_by_username_in_db(
    pool: &SqlitePool,
    username: &str,
) -> Result<User, RequestError> {
    let user = sqlx::query_as::<Sqlite, User>(
        "SELECT username, name, avatar_url FROM users WHERE username = ?1",
    )
    .bind(username)
    .fetch_optional(pool);

    let (exists, user) = tokio::join!(check_exists(pool, Lookup::Username(username)), user);
    if !exists? {
        return Err(RequestError::not_found());
    }
    user?.ok_or_else(RequestError::not_found)
}
