//! Freshness and reconciliation of cached player data.
//!
//! A [`Reconciler`] is opened per request. It holds one store connection, a borrowed
//! [`RiotSource`] and its own TTL cache of league entries, and decides per call whether the
//! cached rows are served as-is or merged with freshly fetched data.

mod identity;
mod matches;
mod rank;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

pub use identity::{PlayerIdentity, ResolvedPlayer, RiotId};
pub use rank::UpsertOutcome;

use crate::cache::TtlCache;
use crate::config::ReconcileSettings;
use crate::db::{ChampionAggregate, MatchRecord, RankSnapshotPair, Store};
use crate::error::AppError;
use crate::riot::{LeagueEntryDto, RiotSource};

const LEAGUE_CACHE_CAPACITY: usize = 100;
const LEAGUE_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Source of "now" in epoch seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Everything the profile page shows for one player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerProfile {
    pub player: ResolvedPlayer,
    pub ranks: RankSnapshotPair,
    pub recent_matches: Vec<MatchRecord>,
    pub top_champions: Vec<ChampionAggregate>,
}

pub struct Reconciler<'a> {
    store: Store,
    riot: &'a dyn RiotSource,
    clock: Arc<dyn Clock>,
    settings: ReconcileSettings,
    league_cache: TtlCache<String, Vec<LeagueEntryDto>>,
}

impl<'a> Reconciler<'a> {
    /// Acquire a store connection for the lifetime of this reconciler.
    pub async fn open(
        pool: &SqlitePool,
        riot: &'a dyn RiotSource,
        settings: ReconcileSettings,
    ) -> Result<Self, AppError> {
        Ok(Self {
            store: Store::acquire(pool).await?,
            riot,
            clock: Arc::new(SystemClock),
            settings,
            league_cache: TtlCache::new(LEAGUE_CACHE_CAPACITY, LEAGUE_CACHE_TTL),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Resolve a Riot ID to a puuid.
    ///
    /// A stored row carrying the name answers only while it is within the staleness window;
    /// Riot IDs can be renamed or reused. Otherwise the account is resolved remotely and the
    /// name moves to the resolved puuid.
    #[instrument(skip_all, fields(riot_id = %identity.riot_id, platform = %identity.platform))]
    pub async fn resolve(&mut self, identity: &PlayerIdentity) -> Result<ResolvedPlayer, AppError> {
        let name = identity.riot_id.to_string();
        let region = identity.platform.to_string();
        let now = self.clock.now();

        if let Some(record) = self.store.summoner_by_name(&name, &region).await? {
            if self.is_fresh(&record, now) {
                debug!(puuid = %record.puuid, "🔎 Resolved from store");
                return ResolvedPlayer::from_record(&record, identity.platform);
            }
            debug!(
                puuid = %record.puuid,
                age_secs = now - record.last_update,
                "🔎 Stored name is stale, resolving remotely"
            );
        }

        let account = self
            .riot
            .account_by_riot_id(
                identity.platform,
                &identity.riot_id.game_name,
                &identity.riot_id.tag_line,
            )
            .await?;
        let summoner = self
            .riot
            .summoner_by_puuid(identity.platform, &account.puuid)
            .await?;

        let riot_id = RiotId {
            game_name: account
                .game_name
                .unwrap_or_else(|| identity.riot_id.game_name.clone()),
            tag_line: account
                .tag_line
                .unwrap_or_else(|| identity.riot_id.tag_line.clone()),
        };

        info!(puuid = %account.puuid, "🔎 Resolved from Riot API");

        let released = self
            .store
            .claim_name(&account.puuid, &riot_id.to_string(), &region)
            .await?;
        if released > 0 {
            info!(released, "🔎 Riot ID moved to a new owner");
        }

        Ok(ResolvedPlayer {
            puuid: account.puuid,
            summoner_id: summoner.id,
            riot_id,
            platform: identity.platform,
            profile_icon_id: Some(summoner.profile_icon_id),
            summoner_level: Some(summoner.summoner_level),
        })
    }

    /// Resolve the player and gather ranks, recent matches and top champions.
    pub async fn profile(&mut self, identity: &PlayerIdentity) -> Result<PlayerProfile, AppError> {
        let player = self.resolve(identity).await?;
        let ranks = self.get_rank_data(&player).await?;
        let recent_matches = self
            .get_recent_matches(&player, self.settings.recent_matches_limit)
            .await?;
        let top_champions = self
            .top_champions(&player.puuid, self.settings.top_champions_limit)
            .await?;

        Ok(PlayerProfile {
            player,
            ranks,
            recent_matches,
            top_champions,
        })
    }

    /// League entries of the player, memoized for [`LEAGUE_CACHE_TTL`].
    async fn league_entries(
        &mut self,
        player: &ResolvedPlayer,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        if let Some(entries) = self.league_cache.get(&player.puuid) {
            return Ok(entries);
        }

        let entries = self
            .riot
            .league_entries(player.platform, &player.puuid)
            .await?;
        self.league_cache
            .insert(player.puuid.clone(), entries.clone());
        Ok(entries)
    }
}
