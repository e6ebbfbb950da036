use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A comment as callers see it: ids in hyphenated text, author resolved
/// from the `users` table at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub post_id: String,
    pub author: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedComment {
    pub id: String,
}
