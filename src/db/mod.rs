mod migrations;
mod models;
mod repository;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

pub use migrations::run_migrations;
pub use models::{
    ChampionAggregate, MatchRecord, PARTICIPANT_SLOTS, Participant, RankSnapshot,
    RankSnapshotPair, SummonerRecord,
};
pub use repository::{Store, validate_schema};

use crate::error::AppError;

/// Open the database, create missing tables and check the columns the store relies on.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    validate_schema(&pool).await?;

    info!(database_url, "🗄️ Database ready");
    Ok(pool)
}

/// Single-connection in-memory database that lives as long as the pool.
pub async fn open_in_memory() -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    run_migrations(&pool).await?;
    validate_schema(&pool).await?;
    Ok(pool)
}
