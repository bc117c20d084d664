use std::env;
use std::num::NonZeroU32;

use crate::error::AppError;

/// How champion aggregates are written after an ingestion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregatePolicy {
    /// Insert-or-replace every recomputed group.
    #[default]
    Replace,
    /// Only write groups that have no row yet. Existing rows keep their numbers.
    CreateIfAbsent,
}

impl AggregatePolicy {
    fn parse(value: &str) -> Result<Self, AppError> {
        match value.to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "create_if_absent" => Ok(Self::CreateIfAbsent),
            other => Err(AppError::Config(format!(
                "AGGREGATE_POLICY must be `replace` or `create_if_absent`, got `{other}`"
            ))),
        }
    }
}

/// Knobs of the reconciliation engine.
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    pub rank_staleness_secs: i64,
    pub season_start_timestamp: i64,
    pub recent_matches_limit: usize,
    pub top_champions_limit: usize,
    pub aggregate_policy: AggregatePolicy,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            rank_staleness_secs: DEFAULT_RANK_STALENESS_SECS,
            season_start_timestamp: DEFAULT_SEASON_START_TIMESTAMP,
            recent_matches_limit: DEFAULT_RECENT_MATCHES_LIMIT,
            top_champions_limit: DEFAULT_TOP_CHAMPIONS_LIMIT,
            aggregate_policy: AggregatePolicy::default(),
        }
    }
}

const DEFAULT_RANK_STALENESS_SECS: i64 = 3600;
// 2026-01-08 00:00:00 UTC
const DEFAULT_SEASON_START_TIMESTAMP: i64 = 1_767_830_400;
const DEFAULT_RECENT_MATCHES_LIMIT: usize = 10;
const DEFAULT_TOP_CHAMPIONS_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub database_url: String,
    pub bind_addr: String,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub reconcile: ReconcileSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:lolprofile.db".into());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());

        let riot_rate_limit_per_second = env::var("RIOT_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_RIOT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        let aggregate_policy = match env::var("AGGREGATE_POLICY") {
            Ok(v) => AggregatePolicy::parse(&v)?,
            Err(_) => AggregatePolicy::default(),
        };

        let reconcile = ReconcileSettings {
            rank_staleness_secs: parse_or("RANK_STALENESS_SECS", DEFAULT_RANK_STALENESS_SECS),
            season_start_timestamp: parse_or(
                "SEASON_START_TIMESTAMP",
                DEFAULT_SEASON_START_TIMESTAMP,
            ),
            recent_matches_limit: parse_or("RECENT_MATCHES_LIMIT", DEFAULT_RECENT_MATCHES_LIMIT),
            top_champions_limit: parse_or("TOP_CHAMPIONS_LIMIT", DEFAULT_TOP_CHAMPIONS_LIMIT),
            aggregate_policy,
        };

        Ok(Self {
            riot_api_key,
            database_url,
            bind_addr,
            riot_rate_limit_per_second,
            reconcile,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
