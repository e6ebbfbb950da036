use domain::IdError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller handed in an id that is not a hyphenated UUID.
    #[error(transparent)]
    InvalidId(#[from] IdError),

    #[error("comment not found: {0}")]
    NotFound(String),

    /// Something the caller relies on after a successful write does not hold,
    /// e.g. a committed row that cannot be read back.
    #[error("consistency check failed: {0}")]
    Consistency(String),

    /// Referential or check constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A statement inside a multi-statement operation failed; the
    /// transaction has been rolled back.
    #[error("{op} rolled back: {source}")]
    Transaction {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Classifies a driver error raised inside a transaction. Constraint
    /// failures keep their database message; everything else is tagged with
    /// the operation that was rolled back.
    pub(crate) fn in_transaction(op: &'static str, err: sqlx::Error) -> Self {
        match constraint_message(&err) {
            Some(message) => Self::Constraint(message),
            None => Self::Transaction { op, source: err },
        }
    }
}

fn constraint_message(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
        Some(db_err.message().to_string())
    } else {
        None
    }
}
