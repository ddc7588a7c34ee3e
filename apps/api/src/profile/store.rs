//! Profile reads shared by the handlers, the Apply Engine, and the match
//! search path.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::UserProfileRow;

/// Returns the user's profile row, or `None` if the user does not exist.
pub async fn load_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfileRow>> {
    Ok(
        sqlx::query_as::<_, UserProfileRow>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Returns the user's skill set in stable (alphabetical) order.
pub async fn load_skills(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>> {
    Ok(
        sqlx::query_scalar("SELECT skill FROM user_skills WHERE user_id = $1 ORDER BY skill")
            .bind(user_id)
            .fetch_all(pool)
            .await?,
    )
}
