//! User Repository (read-only mirror of the external user directory)

use super::RepoResult;
use shared::models::User;

pub async fn find_by_id(
    exec: impl sqlx::SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, name, role FROM user WHERE id = ?")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(user)
}
