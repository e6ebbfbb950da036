use axum::http::StatusCode;
use storage::StoreError;

pub type ApiError = (StatusCode, String);

pub fn store_error(err: StoreError) -> ApiError {
    let status = match &err {
        StoreError::InvalidId(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Constraint(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::Consistency(_)
        | StoreError::Transaction { .. }
        | StoreError::Database(_)
        | StoreError::Migrate(_)
        | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Comment store failure: {}", err);
    }
    (status, err.to_string())
}
