use sqlx::SqlitePool;
use tracing::info;

use super::models::PARTICIPANT_SLOTS;
use crate::error::AppError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS summoners (
    puuid TEXT PRIMARY KEY NOT NULL,
    summoner_id TEXT,
    name TEXT NOT NULL,
    region TEXT NOT NULL,
    profile_icon_id INTEGER,
    summoner_level INTEGER,
    last_update INTEGER NOT NULL,
    soloq_tier TEXT,
    soloq_division TEXT,
    soloq_lp INTEGER NOT NULL DEFAULT 0,
    soloq_wins INTEGER NOT NULL DEFAULT 0,
    soloq_losses INTEGER NOT NULL DEFAULT 0,
    soloq_wr INTEGER NOT NULL DEFAULT 0,
    flex_tier TEXT,
    flex_division TEXT,
    flex_lp INTEGER NOT NULL DEFAULT 0,
    flex_wins INTEGER NOT NULL DEFAULT 0,
    flex_losses INTEGER NOT NULL DEFAULT 0,
    flex_wr INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS champion_stats (
    puuid TEXT NOT NULL,
    champion_name TEXT NOT NULL,
    matches_played INTEGER NOT NULL,
    wins INTEGER NOT NULL,
    losses INTEGER NOT NULL,
    wr INTEGER NOT NULL,
    kda REAL NOT NULL,
    kills REAL NOT NULL,
    deaths REAL NOT NULL,
    assists REAL NOT NULL,
    cs INTEGER NOT NULL,
    PRIMARY KEY (puuid, champion_name)
);

-- Matches fetched for a player that do not list them; never fetched again.
CREATE TABLE IF NOT EXISTS skipped_matches (
    puuid TEXT NOT NULL,
    match_id TEXT NOT NULL,
    PRIMARY KEY (puuid, match_id)
);

CREATE INDEX IF NOT EXISTS idx_summoners_name ON summoners(LOWER(name), region);
"#;

/// `matches` carries ten participant column triples, so its DDL is generated.
fn matches_table_sql() -> String {
    let participants: String = (1..=PARTICIPANT_SLOTS)
        .map(|n| {
            format!(
                "    participant{n}_name TEXT,\n    participant{n}_champion TEXT,\n    participant{n}_team_id INTEGER,\n"
            )
        })
        .collect();

    format!(
        r#"
CREATE TABLE IF NOT EXISTS matches (
    puuid TEXT NOT NULL,
    match_id TEXT NOT NULL,
    queue_id INTEGER NOT NULL,
    game_mode TEXT NOT NULL,
    game_duration INTEGER NOT NULL,
    champion_name TEXT NOT NULL,
    win INTEGER NOT NULL,
    kills INTEGER NOT NULL,
    deaths INTEGER NOT NULL,
    assists INTEGER NOT NULL,
    kda REAL NOT NULL,
    cs INTEGER NOT NULL,
    vision INTEGER NOT NULL,
    spell1 INTEGER NOT NULL,
    spell2 INTEGER NOT NULL,
    item0 INTEGER NOT NULL,
    item1 INTEGER NOT NULL,
    item2 INTEGER NOT NULL,
    item3 INTEGER NOT NULL,
    item4 INTEGER NOT NULL,
    item5 INTEGER NOT NULL,
    item6 INTEGER NOT NULL,
{participants}    PRIMARY KEY (puuid, match_id)
);
"#
    )
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    sqlx::raw_sql(&matches_table_sql()).execute(pool).await?;
    info!("🗄️ Database migrations completed");
    Ok(())
}
