use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::{fs, path::Path, str::FromStr, time::Duration};
use tracing::info;

mod error;
mod models;
mod repo;

pub use error::{StoreError, StoreResult};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection settings for [`Db::connect`].
#[derive(Debug, Clone)]
pub struct DbOptions {
    pub url: String,
    pub max_connections: u32,
}

impl DbOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    fn in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// The comment store. Cheap to clone; every clone shares one pool.
#[derive(Clone)]
pub struct Db {
    pub(crate) pool: Pool<Sqlite>,
}

impl Db {
    pub async fn new(db_url: &str) -> StoreResult<Self> {
        Self::connect(&DbOptions::new(db_url)).await
    }

    pub async fn connect(options: &DbOptions) -> StoreResult<Self> {
        let in_memory = options.in_memory();
        if options.url.starts_with("sqlite://") && !in_memory {
            let path_str = options.url.trim_start_matches("sqlite://");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let mut connect = SqliteConnectOptions::from_str(&options.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives and dies with its connection, so the
        // pool must hold exactly one and never recycle it.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            connect = connect
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
            SqlitePoolOptions::new().max_connections(options.max_connections.max(1))
        };

        let pool = pool_options.connect_with(connect).await?;
        sqlx::migrate!("../../migrations").run(&pool).await?;
        info!("Database ready: {} (in_memory={})", options.url, in_memory);

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
