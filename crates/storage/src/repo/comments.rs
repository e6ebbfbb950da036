use crate::{models::SqlComment, Db, StoreError, StoreResult};
use domain::{BinaryId, Comment, DeletedComment};
use sqlx::{Connection, Sqlite, SqliteConnection, Transaction};
use tracing::{debug, error, warn};

const SELECT_LIVE_BY_ID: &str = r#"
    SELECT
        comments.id,
        comments.content,
        comments.user_id,
        comments.post_id,
        users.nickname AS author,
        comments.created_at,
        comments.updated_at,
        comments.deleted_at
    FROM comments
    JOIN users ON comments.user_id = users.id
    WHERE comments.id = ? AND comments.deleted_at IS NULL
"#;

// updated_at first; created_at and id only break ties.
const SELECT_LIVE_BY_POST: &str = r#"
    SELECT
        comments.id,
        comments.content,
        comments.user_id,
        comments.post_id,
        users.nickname AS author,
        comments.created_at,
        comments.updated_at,
        comments.deleted_at
    FROM comments
    JOIN users ON comments.user_id = users.id
    WHERE comments.post_id = ? AND comments.deleted_at IS NULL
    ORDER BY comments.updated_at ASC, comments.created_at ASC, comments.id ASC
"#;

impl Db {
    /// Inserts a comment and bumps its post's `comment_count` in one
    /// transaction, then reads the row back with the author's nickname.
    ///
    /// A post that is missing or soft-deleted rejects the comment with
    /// [`StoreError::Constraint`] and nothing is written.
    pub async fn create_comment(
        &self,
        content: &str,
        user_id: &str,
        post_id: &str,
    ) -> StoreResult<Comment> {
        const OP: &str = "create_comment";

        let id = BinaryId::new_v4();
        let user = BinaryId::encode(user_id)?;
        let post = BinaryId::encode(post_id)?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| StoreError::in_transaction(OP, e))?;
        let outcome = insert_counted(&mut tx, &id, content, &user, &post).await;
        finish(tx, OP, outcome).await?;
        debug!("Comment {} created on post {}", id, post);

        // Read back on the same connection. The insert is already committed,
        // so a miss here is reported, not undone.
        let row = fetch_live(&mut conn, &id).await?;
        row.ok_or_else(|| {
            error!("Comment {} committed but not readable", id);
            StoreError::Consistency(format!("created comment {id} could not be read back"))
        })
    }

    /// Soft delete plus counter decrement. Idempotent: a second call is a no-op.
    pub async fn delete_comment(
        &self,
        comment_id: &str,
        post_id: &str,
    ) -> StoreResult<DeletedComment> {
        const OP: &str = "delete_comment";

        let comment = BinaryId::encode(comment_id)?;
        let post = BinaryId::encode(post_id)?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| StoreError::in_transaction(OP, e))?;
        let outcome = soft_delete_counted(&mut tx, &comment, &post).await;
        let removed = finish(tx, OP, outcome).await?;

        if removed {
            debug!("Comment {} deleted from post {}", comment, post);
        } else {
            warn!(
                "Delete of comment {} on post {} matched no live row, counter untouched",
                comment, post
            );
        }

        Ok(DeletedComment {
            id: comment_id.to_string(),
        })
    }

    pub async fn update_comment(&self, comment_id: &str, content: &str) -> StoreResult<Comment> {
        let comment = BinaryId::encode(comment_id)?;
        let mut conn = self.pool.acquire().await?;

        let changed = sqlx::query(
            r#"
            UPDATE comments
            SET content = ?, updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(content)
        .bind(comment.as_bytes().as_slice())
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if changed == 0 {
            debug!("Update of comment {} matched no live row", comment);
        }

        fetch_live(&mut conn, &comment)
            .await?
            .ok_or_else(|| StoreError::NotFound(comment_id.to_string()))
    }

    /// `None` when the comment does not exist or has been deleted.
    pub async fn get_comment(&self, comment_id: &str) -> StoreResult<Option<Comment>> {
        let comment = BinaryId::encode(comment_id)?;
        let mut conn = self.pool.acquire().await?;
        fetch_live(&mut conn, &comment).await
    }

    /// Live comments of a post, least recently modified first.
    pub async fn list_comments_by_post(&self, post_id: &str) -> StoreResult<Vec<Comment>> {
        let post = BinaryId::encode(post_id)?;

        let rows = sqlx::query_as::<_, SqlComment>(SELECT_LIVE_BY_POST)
            .bind(post.as_bytes().as_slice())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }
}

async fn insert_counted(
    conn: &mut SqliteConnection,
    id: &BinaryId,
    content: &str,
    user: &BinaryId,
    post: &BinaryId,
) -> StoreResult<()> {
    const OP: &str = "create_comment";

    // 1. insert the comment row
    sqlx::query(
        r#"
        INSERT INTO comments (id, content, user_id, post_id, created_at, updated_at)
        VALUES (
            ?, ?, ?, ?,
            strftime('%Y-%m-%d %H:%M:%f', 'now'),
            strftime('%Y-%m-%d %H:%M:%f', 'now')
        )
        "#,
    )
    .bind(id.as_bytes().as_slice())
    .bind(content)
    .bind(user.as_bytes().as_slice())
    .bind(post.as_bytes().as_slice())
    .execute(&mut *conn)
    .await
    .map_err(|e| StoreError::in_transaction(OP, e))?;

    // 2. bump the counter; a deleted post matches nothing
    let counted = sqlx::query(
        "UPDATE posts SET comment_count = comment_count + 1 WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(post.as_bytes().as_slice())
    .execute(&mut *conn)
    .await
    .map_err(|e| StoreError::in_transaction(OP, e))?
    .rows_affected();

    if counted == 0 {
        return Err(StoreError::Constraint(format!(
            "post {post} is missing or deleted"
        )));
    }
    Ok(())
}

/// Returns whether this call performed the soft delete.
async fn soft_delete_counted(
    conn: &mut SqliteConnection,
    comment: &BinaryId,
    post: &BinaryId,
) -> StoreResult<bool> {
    const OP: &str = "delete_comment";

    // 1. soft delete, only if still live and on this post
    let removed = sqlx::query(
        r#"
        UPDATE comments
        SET deleted_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE id = ? AND post_id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(comment.as_bytes().as_slice())
    .bind(post.as_bytes().as_slice())
    .execute(&mut *conn)
    .await
    .map_err(|e| StoreError::in_transaction(OP, e))?
    .rows_affected();

    if removed != 1 {
        return Ok(false);
    }

    // 2. decrement only for the row we just removed
    sqlx::query(
        "UPDATE posts SET comment_count = comment_count - 1 WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(post.as_bytes().as_slice())
    .execute(&mut *conn)
    .await
    .map_err(|e| StoreError::in_transaction(OP, e))?;

    Ok(true)
}

async fn finish<T>(
    tx: Transaction<'_, Sqlite>,
    op: &'static str,
    outcome: StoreResult<T>,
) -> StoreResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| StoreError::in_transaction(op, e))?;
            Ok(value)
        }
        Err(err) => {
            error!("{} failed, rolling back: {}", op, err);
            if let Err(rollback_err) = tx.rollback().await {
                warn!("{} rollback failed: {}", op, rollback_err);
            }
            Err(err)
        }
    }
}

async fn fetch_live(conn: &mut SqliteConnection, id: &BinaryId) -> StoreResult<Option<Comment>> {
    let row = sqlx::query_as::<_, SqlComment>(SELECT_LIVE_BY_ID)
        .bind(id.as_bytes().as_slice())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(Comment::try_from).transpose()
}
