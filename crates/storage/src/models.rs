use chrono::NaiveDateTime;
use domain::{BinaryId, Comment};
use sqlx::FromRow;

use crate::StoreError;

/// A `comments` row joined with `users.nickname`. Ids are still raw bytes.
#[derive(FromRow)]
pub struct SqlComment {
    pub id: Vec<u8>,
    pub content: String,
    pub user_id: Vec<u8>,
    pub post_id: Vec<u8>,
    pub author: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl TryFrom<SqlComment> for Comment {
    type Error = StoreError;

    fn try_from(sql: SqlComment) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: stored_id("id", &sql.id)?,
            content: sql.content,
            user_id: stored_id("user_id", &sql.user_id)?,
            post_id: stored_id("post_id", &sql.post_id)?,
            author: sql.author,
            created_at: sql.created_at,
            updated_at: sql.updated_at,
            deleted_at: sql.deleted_at,
        })
    }
}

// A stored id that does not decode means the table was written by something
// other than this store.
fn stored_id(column: &str, bytes: &[u8]) -> Result<String, StoreError> {
    BinaryId::from_slice(bytes)
        .map(|id| id.decode())
        .map_err(|e| StoreError::Consistency(format!("comments.{column}: {e}")))
}
