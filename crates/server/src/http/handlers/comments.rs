use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::{Comment, DeletedComment};
use serde::Deserialize;
use storage::Db;

use crate::http::error::{store_error, ApiError};

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

pub async fn list_comments(
    State(db): State<Db>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = db
        .list_comments_by_post(&post_id)
        .await
        .map_err(store_error)?;

    Ok(Json(comments))
}

pub async fn create_comment(
    State(db): State<Db>,
    Path(post_id): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = db
        .create_comment(&payload.content, &payload.user_id, &post_id)
        .await
        .map_err(store_error)?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comment(
    State(db): State<Db>,
    Path(comment_id): Path<String>,
) -> Result<Json<Comment>, ApiError> {
    match db.get_comment(&comment_id).await.map_err(store_error)? {
        Some(comment) => Ok(Json(comment)),
        None => Err((StatusCode::NOT_FOUND, "Comment not found".to_string())),
    }
}

pub async fn update_comment(
    State(db): State<Db>,
    Path(comment_id): Path<String>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let comment = db
        .update_comment(&comment_id, &payload.content)
        .await
        .map_err(store_error)?;

    Ok(Json(comment))
}

pub async fn delete_comment(
    State(db): State<Db>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<DeletedComment>, ApiError> {
    let deleted = db
        .delete_comment(&comment_id, &post_id)
        .await
        .map_err(store_error)?;

    Ok(Json(deleted))
}
