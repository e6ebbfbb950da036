use crate::{Db, StoreResult};
use domain::BinaryId;

impl Db {
    /// The denormalised `comment_count` of a post, or `None` for an unknown
    /// id. Soft-deleted posts still report their frozen counter.
    pub async fn post_comment_count(&self, post_id: &str) -> StoreResult<Option<i64>> {
        let post = BinaryId::encode(post_id)?;

        let count = sqlx::query_scalar::<_, i64>("SELECT comment_count FROM posts WHERE id = ?")
            .bind(post.as_bytes().as_slice())
            .fetch_optional(&self.pool)
            .await?;

        Ok(count)
    }
}
