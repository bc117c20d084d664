use sqlx::{Sqlite, SqlitePool, pool::PoolConnection};

use super::models::{ChampionAggregate, MatchRecord, PARTICIPANT_SLOTS, RankSnapshot, SummonerRecord};
use crate::config::AggregatePolicy;
use crate::error::AppError;

const SUMMONER_COLUMN_NAMES: [&str; 19] = [
    "puuid",
    "summoner_id",
    "name",
    "region",
    "profile_icon_id",
    "summoner_level",
    "last_update",
    "soloq_tier",
    "soloq_division",
    "soloq_lp",
    "soloq_wins",
    "soloq_losses",
    "soloq_wr",
    "flex_tier",
    "flex_division",
    "flex_lp",
    "flex_wins",
    "flex_losses",
    "flex_wr",
];

const MATCH_BASE_COLUMN_NAMES: [&str; 22] = [
    "puuid",
    "match_id",
    "queue_id",
    "game_mode",
    "game_duration",
    "champion_name",
    "win",
    "kills",
    "deaths",
    "assists",
    "kda",
    "cs",
    "vision",
    "spell1",
    "spell2",
    "item0",
    "item1",
    "item2",
    "item3",
    "item4",
    "item5",
    "item6",
];

const CHAMPION_STATS_COLUMN_NAMES: [&str; 11] = [
    "puuid",
    "champion_name",
    "matches_played",
    "wins",
    "losses",
    "wr",
    "kda",
    "kills",
    "deaths",
    "assists",
    "cs",
];

const SKIPPED_MATCH_COLUMN_NAMES: [&str; 2] = ["puuid", "match_id"];

fn match_column_names() -> Vec<String> {
    let mut columns: Vec<String> = MATCH_BASE_COLUMN_NAMES
        .iter()
        .map(|c| c.to_string())
        .collect();
    for n in 1..=PARTICIPANT_SLOTS {
        columns.push(format!("participant{n}_name"));
        columns.push(format!("participant{n}_champion"));
        columns.push(format!("participant{n}_team_id"));
    }
    columns
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Check every column the store reads or writes exists, so a schema drift fails at startup
/// instead of mis-mapping rows later.
pub async fn validate_schema(pool: &SqlitePool) -> Result<(), AppError> {
    let expected: [(&'static str, Vec<String>); 4] = [
        (
            "summoners",
            SUMMONER_COLUMN_NAMES.iter().map(|c| c.to_string()).collect(),
        ),
        ("matches", match_column_names()),
        (
            "champion_stats",
            CHAMPION_STATS_COLUMN_NAMES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        ),
        (
            "skipped_matches",
            SKIPPED_MATCH_COLUMN_NAMES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        ),
    ];

    for (table, columns) in expected {
        let present: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
                .bind(table)
                .fetch_all(pool)
                .await?;

        if let Some(missing) = columns.into_iter().find(|c| !present.contains(c)) {
            return Err(AppError::Schema {
                table,
                column: missing,
            });
        }
    }

    Ok(())
}

/// Store access bound to one pooled connection.
///
/// The connection goes back to the pool when the `Store` is dropped, on every exit path.
#[derive(Debug)]
pub struct Store {
    conn: PoolConnection<Sqlite>,
}

impl Store {
    pub async fn acquire(pool: &SqlitePool) -> Result<Self, AppError> {
        let conn = pool.acquire().await?;
        Ok(Self { conn })
    }

    // === Summoner operations ===

    pub async fn summoner(&mut self, puuid: &str) -> Result<Option<SummonerRecord>, AppError> {
        let columns = SUMMONER_COLUMN_NAMES.join(", ");
        let summoner = sqlx::query_as::<_, SummonerRecord>(&format!(
            "SELECT {columns} FROM summoners WHERE puuid = ?"
        ))
        .bind(puuid)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(summoner)
    }

    /// Lookup by Riot ID. Only a hint to skip a remote resolution; names are not join keys.
    pub async fn summoner_by_name(
        &mut self,
        name: &str,
        region: &str,
    ) -> Result<Option<SummonerRecord>, AppError> {
        let columns = SUMMONER_COLUMN_NAMES.join(", ");
        let summoner = sqlx::query_as::<_, SummonerRecord>(&format!(
            "SELECT {columns} FROM summoners WHERE LOWER(name) = LOWER(?) AND region = ?"
        ))
        .bind(name)
        .bind(region)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(summoner)
    }

    /// Insert a new summoner row. Returns `false` if the puuid already had one.
    pub async fn insert_summoner(&mut self, record: &SummonerRecord) -> Result<bool, AppError> {
        let query = format!(
            "INSERT INTO summoners ({}) VALUES ({}) ON CONFLICT(puuid) DO NOTHING",
            SUMMONER_COLUMN_NAMES.join(", "),
            placeholders(SUMMONER_COLUMN_NAMES.len())
        );

        let query = sqlx::query(&query)
            .bind(&record.puuid)
            .bind(&record.summoner_id)
            .bind(&record.name)
            .bind(&record.region)
            .bind(record.profile_icon_id)
            .bind(record.summoner_level)
            .bind(record.last_update);
        let query = bind_rank(query, &record.ranks.solo);
        let query = bind_rank(query, &record.ranks.flex);

        let result = query.execute(&mut *self.conn).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite profile and rank fields and bump `last_update`.
    pub async fn update_summoner(&mut self, record: &SummonerRecord) -> Result<(), AppError> {
        let query = sqlx::query(
            r#"
            UPDATE summoners SET
                summoner_id = ?,
                name = ?,
                region = ?,
                profile_icon_id = ?,
                summoner_level = ?,
                last_update = ?,
                soloq_tier = ?, soloq_division = ?, soloq_lp = ?,
                soloq_wins = ?, soloq_losses = ?, soloq_wr = ?,
                flex_tier = ?, flex_division = ?, flex_lp = ?,
                flex_wins = ?, flex_losses = ?, flex_wr = ?
            WHERE puuid = ?
            "#,
        )
        .bind(&record.summoner_id)
        .bind(&record.name)
        .bind(&record.region)
        .bind(record.profile_icon_id)
        .bind(record.summoner_level)
        .bind(record.last_update);
        let query = bind_rank(query, &record.ranks.solo);
        let query = bind_rank(query, &record.ranks.flex);

        query
            .bind(&record.puuid)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    /// Give `name` to `puuid` on `region` and release it from any other row there.
    ///
    /// Returns how many other rows lost the name. A released row keeps its data but no longer
    /// answers [`Store::summoner_by_name`] until its own player is resolved again.
    pub async fn claim_name(
        &mut self,
        puuid: &str,
        name: &str,
        region: &str,
    ) -> Result<u64, AppError> {
        let released = sqlx::query(
            "UPDATE summoners SET name = '' WHERE LOWER(name) = LOWER(?) AND region = ? AND puuid <> ?",
        )
        .bind(name)
        .bind(region)
        .bind(puuid)
        .execute(&mut *self.conn)
        .await?;

        sqlx::query("UPDATE summoners SET name = ? WHERE puuid = ? AND region = ?")
            .bind(name)
            .bind(puuid)
            .bind(region)
            .execute(&mut *self.conn)
            .await?;

        Ok(released.rows_affected())
    }

    // === Match operations ===

    pub async fn match_ids(&mut self, puuid: &str) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>("SELECT match_id FROM matches WHERE puuid = ?")
            .bind(puuid)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(ids)
    }

    /// Insert a match. A `(puuid, match_id)` duplicate is skipped and reported as `false`.
    pub async fn insert_match(&mut self, record: &MatchRecord) -> Result<bool, AppError> {
        let columns = match_column_names();
        let query = format!(
            "INSERT INTO matches ({}) VALUES ({}) ON CONFLICT(puuid, match_id) DO NOTHING",
            columns.join(", "),
            placeholders(columns.len())
        );

        let mut query = sqlx::query(&query)
            .bind(&record.puuid)
            .bind(&record.match_id)
            .bind(record.queue_id)
            .bind(&record.game_mode)
            .bind(record.game_duration)
            .bind(&record.champion_name)
            .bind(record.win)
            .bind(record.kills)
            .bind(record.deaths)
            .bind(record.assists)
            .bind(record.kda)
            .bind(record.cs)
            .bind(record.vision)
            .bind(record.spells[0])
            .bind(record.spells[1]);
        for item in record.items {
            query = query.bind(item);
        }
        for slot in 0..PARTICIPANT_SLOTS {
            let participant = record.participants.get(slot);
            query = query
                .bind(participant.map(|p| p.name.clone()))
                .bind(participant.map(|p| p.champion.clone()))
                .bind(participant.map(|p| p.team_id));
        }

        let result = query.execute(&mut *self.conn).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn match_count(&mut self, puuid: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM matches WHERE puuid = ?")
            .bind(puuid)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }

    /// Record that `match_id` was fetched for `puuid` but does not list them.
    pub async fn skip_match(&mut self, puuid: &str, match_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO skipped_matches (puuid, match_id) VALUES (?, ?) ON CONFLICT(puuid, match_id) DO NOTHING",
        )
        .bind(puuid)
        .bind(match_id)
        .execute(&mut *self.conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn skipped_match_ids(&mut self, puuid: &str) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT match_id FROM skipped_matches WHERE puuid = ?",
        )
        .bind(puuid)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(ids)
    }

    /// Every stored match of the player, in no particular order.
    pub async fn matches(&mut self, puuid: &str) -> Result<Vec<MatchRecord>, AppError> {
        let columns = match_column_names().join(", ");
        let matches = sqlx::query_as::<_, MatchRecord>(&format!(
            "SELECT {columns} FROM matches WHERE puuid = ?"
        ))
        .bind(puuid)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(matches)
    }

    // === Champion aggregate operations ===

    /// Write aggregates according to `policy`. Returns the number of rows written.
    pub async fn write_champion_stats(
        &mut self,
        aggregates: &[ChampionAggregate],
        policy: AggregatePolicy,
    ) -> Result<u64, AppError> {
        let conflict = match policy {
            AggregatePolicy::Replace => {
                "ON CONFLICT(puuid, champion_name) DO UPDATE SET
                    matches_played = excluded.matches_played,
                    wins = excluded.wins,
                    losses = excluded.losses,
                    wr = excluded.wr,
                    kda = excluded.kda,
                    kills = excluded.kills,
                    deaths = excluded.deaths,
                    assists = excluded.assists,
                    cs = excluded.cs"
            }
            AggregatePolicy::CreateIfAbsent => "ON CONFLICT(puuid, champion_name) DO NOTHING",
        };
        let query = format!(
            "INSERT INTO champion_stats ({}) VALUES ({}) {conflict}",
            CHAMPION_STATS_COLUMN_NAMES.join(", "),
            placeholders(CHAMPION_STATS_COLUMN_NAMES.len())
        );

        let mut written = 0;
        for aggregate in aggregates {
            let result = sqlx::query(&query)
                .bind(&aggregate.puuid)
                .bind(&aggregate.champion_name)
                .bind(aggregate.matches_played)
                .bind(aggregate.wins)
                .bind(aggregate.losses)
                .bind(aggregate.win_rate)
                .bind(aggregate.kda)
                .bind(aggregate.avg_kills)
                .bind(aggregate.avg_deaths)
                .bind(aggregate.avg_assists)
                .bind(aggregate.avg_cs)
                .execute(&mut *self.conn)
                .await?;
            written += result.rows_affected();
        }
        Ok(written)
    }

    /// Sum of `matches_played` over the player's aggregates.
    pub async fn aggregated_match_count(&mut self, puuid: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(matches_played), 0) FROM champion_stats WHERE puuid = ?",
        )
        .bind(puuid)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(count)
    }

    pub async fn top_champions(
        &mut self,
        puuid: &str,
        limit: usize,
    ) -> Result<Vec<ChampionAggregate>, AppError> {
        let columns = CHAMPION_STATS_COLUMN_NAMES.join(", ");
        let champions = sqlx::query_as::<_, ChampionAggregate>(&format!(
            r#"
            SELECT {columns}
            FROM champion_stats
            WHERE puuid = ?
            ORDER BY matches_played DESC, wr DESC, kda DESC
            LIMIT ?
            "#
        ))
        .bind(puuid)
        .bind(limit as i64)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(champions)
    }
}

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

fn bind_rank<'q>(query: SqliteQuery<'q>, rank: &'q RankSnapshot) -> SqliteQuery<'q> {
    query
        .bind(&rank.tier)
        .bind(&rank.division)
        .bind(rank.league_points)
        .bind(rank.wins)
        .bind(rank.losses)
        .bind(rank.win_rate)
}
