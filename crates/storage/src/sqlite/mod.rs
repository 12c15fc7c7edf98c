use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use snafu::{ResultExt, Snafu};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Connection, SqliteConnection};

use super::KeyValueStore;
use super::error::{StorageError, StorageResult};

const BACKEND_NAME: &str = "sqlite";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SqliteError {
    #[snafu(display("sqlite location '{database_location}' is in-memory; a file path is required"))]
    InMemoryUnsupported {
        stage: &'static str,
        database_location: String,
    },
    #[snafu(display("failed to create sqlite directory at {path}"))]
    CreateSqliteDirectory {
        stage: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("failed to parse sqlite connection URL '{database_url}'"))]
    SqliteConnectOptions {
        stage: &'static str,
        database_url: String,
        source: sqlx::Error,
    },
    #[snafu(display("failed to connect sqlite database '{database_url}'"))]
    SqliteConnect {
        stage: &'static str,
        database_url: String,
        source: sqlx::Error,
    },
    #[snafu(display("failed to configure sqlite pragma '{pragma}'"))]
    SqlitePragma {
        stage: &'static str,
        pragma: &'static str,
        source: sqlx::Error,
    },
    #[snafu(display("failed to run sqlite migrations"))]
    SqliteMigrate {
        stage: &'static str,
        source: sqlx::migrate::MigrateError,
    },
    #[snafu(display("sqlite query failed at {stage}: {source}"))]
    SqliteQuery {
        stage: &'static str,
        source: sqlx::Error,
    },
    #[snafu(display("failed to spawn sqlite worker thread"))]
    SqliteThreadSpawn {
        stage: &'static str,
        source: std::io::Error,
    },
    #[snafu(display("failed to initialize sqlite worker runtime"))]
    SqliteRuntimeInit {
        stage: &'static str,
        source: std::io::Error,
    },
    #[snafu(display("sqlite worker thread panicked during {stage}"))]
    SqliteWorkerPanicked { stage: &'static str },
}

impl SqliteError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InMemoryUnsupported { stage, .. }
            | Self::CreateSqliteDirectory { stage, .. }
            | Self::SqliteConnectOptions { stage, .. }
            | Self::SqliteConnect { stage, .. }
            | Self::SqlitePragma { stage, .. }
            | Self::SqliteMigrate { stage, .. }
            | Self::SqliteQuery { stage, .. }
            | Self::SqliteThreadSpawn { stage, .. }
            | Self::SqliteRuntimeInit { stage, .. }
            | Self::SqliteWorkerPanicked { stage } => stage,
        }
    }
}

impl From<SqliteError> for StorageError {
    fn from(error: SqliteError) -> Self {
        StorageError::Backend {
            stage: error.stage(),
            backend: BACKEND_NAME,
            source: Box::new(error),
        }
    }
}

/// Key-value store persisted in a single SQLite table.
///
/// The store trait is sync while sqlx is async; every call runs on a dedicated
/// worker thread with its own current-thread runtime so it can be invoked from
/// inside another runtime without nested-runtime panics.
#[derive(Debug, Clone)]
pub struct SqliteKvStore {
    database_url: String,
}

impl SqliteKvStore {
    pub async fn open(database_location: &str) -> Result<Self, SqliteError> {
        if database_location == ":memory:" || database_location.contains(":memory:") {
            return InMemoryUnsupportedSnafu {
                stage: "sqlite-open-validate-location",
                database_location: database_location.to_string(),
            }
            .fail();
        }

        ensure_database_directory(database_location)?;

        let database_url = normalize_database_url(database_location);
        let connect_options = SqliteConnectOptions::from_str(&database_url)
            .context(SqliteConnectOptionsSnafu {
                stage: "sqlite-open-parse-url",
                database_url: database_url.clone(),
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(5_000));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await
            .context(SqliteConnectSnafu {
                stage: "sqlite-open-connect",
                database_url: database_url.clone(),
            })?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context(SqliteMigrateSnafu {
                stage: "sqlite-open-migrate",
            })?;

        // Per-call connections are opened by the workers; the bootstrap pool is only for migrations.
        pool.close().await;

        tracing::debug!("opened sqlite key-value store at {database_url}");
        Ok(Self { database_url })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    fn run_db_call<T, F>(&self, stage: &'static str, op: F) -> Result<T, SqliteError>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, SqliteError>> + Send + 'static,
    {
        let worker = std::thread::Builder::new()
            .name(format!("sqlite-kv-{stage}"))
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .context(SqliteRuntimeInitSnafu {
                        stage: "sqlite-kv-runtime-build",
                    })?;
                runtime.block_on(op)
            })
            .context(SqliteThreadSpawnSnafu {
                stage: "sqlite-kv-spawn-worker",
            })?;

        match worker.join() {
            Ok(result) => result,
            Err(_) => SqliteWorkerPanickedSnafu { stage }.fail(),
        }
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let database_url = self.database_url.clone();
        let key = key.to_string();
        let value = self.run_db_call("kv-get", async move {
            let mut connection = connect_store_connection(&database_url, "kv-get-connect").await?;
            sqlx::query_scalar::<_, String>("SELECT value FROM kv_entries WHERE key = ?")
                .bind(key)
                .fetch_optional(&mut connection)
                .await
                .context(SqliteQuerySnafu {
                    stage: "kv-get-query",
                })
        })?;

        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let database_url = self.database_url.clone();
        let key = key.to_string();
        let value = value.to_string();
        self.run_db_call("kv-set", async move {
            let mut connection = connect_store_connection(&database_url, "kv-set-connect").await?;
            sqlx::query(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?, ?, ?) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(key)
            .bind(value)
            .bind(unix_timestamp_seconds())
            .execute(&mut connection)
            .await
            .context(SqliteQuerySnafu {
                stage: "kv-set-upsert",
            })?;
            Ok(())
        })?;

        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let database_url = self.database_url.clone();
        let key = key.to_string();
        self.run_db_call("kv-remove", async move {
            let mut connection =
                connect_store_connection(&database_url, "kv-remove-connect").await?;
            sqlx::query("DELETE FROM kv_entries WHERE key = ?")
                .bind(key)
                .execute(&mut connection)
                .await
                .context(SqliteQuerySnafu {
                    stage: "kv-remove-delete",
                })?;
            Ok(())
        })?;

        Ok(())
    }
}

async fn connect_store_connection(
    database_url: &str,
    stage: &'static str,
) -> Result<SqliteConnection, SqliteError> {
    let mut connection =
        SqliteConnection::connect(database_url)
            .await
            .context(SqliteConnectSnafu {
                stage,
                database_url: database_url.to_string(),
            })?;

    sqlx::query("PRAGMA busy_timeout = 5000;")
        .execute(&mut connection)
        .await
        .context(SqlitePragmaSnafu {
            stage: "sqlite-kv-pragma-busy-timeout",
            pragma: "busy_timeout",
        })?;

    Ok(connection)
}

fn unix_timestamp_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0_i64, |duration| duration.as_secs() as i64)
}

fn ensure_database_directory(database_location: &str) -> Result<(), SqliteError> {
    if database_location.starts_with("sqlite:") {
        return Ok(());
    }

    let path = Path::new(database_location);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).context(CreateSqliteDirectorySnafu {
            stage: "sqlite-open-create-directory",
            path: parent.display().to_string(),
        })?;
    }

    Ok(())
}

fn normalize_database_url(database_location: &str) -> String {
    if database_location.starts_with("sqlite:") {
        return database_location.to_string();
    }

    format!("sqlite://{database_location}")
}
