use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use super::{Reconciler, ResolvedPlayer};
use crate::config::AggregatePolicy;
use crate::db::{ChampionAggregate, MatchRecord};
use crate::error::AppError;
use crate::riot::MATCH_IDS_PAGE_SIZE;
use crate::stats;

impl Reconciler<'_> {
    /// Merge ranked matches missing locally, then return the newest `limit` stored ones.
    ///
    /// Every fetched match is stored as soon as it arrives, so a failing fetch keeps the
    /// matches ingested before it (and their aggregates) and then returns the fetch error.
    #[instrument(skip_all, fields(puuid = %player.puuid, limit = limit))]
    pub async fn get_recent_matches(
        &mut self,
        player: &ResolvedPlayer,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, AppError> {
        let stored: HashSet<String> = self
            .store
            .match_ids(&player.puuid)
            .await?
            .into_iter()
            .collect();
        let latest = stored.iter().max_by(|a, b| stats::compare_match_ids(a, b));
        let skipped: HashSet<String> = self
            .store
            .skipped_match_ids(&player.puuid)
            .await?
            .into_iter()
            .collect();
        debug!(
            stored = stored.len(),
            skipped = skipped.len(),
            latest = ?latest,
            "⚔️ Local match history"
        );

        let remote = self.ranked_match_ids(player).await?;
        let candidates: Vec<&String> = remote
            .iter()
            .filter(|id| !stored.contains(*id) && !skipped.contains(*id))
            .collect();

        if stored.is_empty() && !candidates.is_empty() {
            info!(count = candidates.len(), "⚔️ Backfilling match history");
        } else if !candidates.is_empty() {
            info!(count = candidates.len(), "⚔️ New matches found");
        }

        let mut inserted = 0usize;
        let mut failure = None;
        for match_id in candidates {
            match self.ingest_match(player, match_id).await {
                Ok(true) => inserted += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        error = %e,
                        match_id = %match_id,
                        inserted,
                        "⚔️ ⚠️ Match fetch failed, stopping pass"
                    );
                    failure = Some(e);
                    break;
                }
            }
        }

        let synced = self.sync_champion_stats(&player.puuid, inserted > 0).await;
        if let Some(e) = failure {
            if let Err(stats_err) = synced {
                warn!(error = %stats_err, "📊 ⚠️ Champion stats recompute failed");
            }
            return Err(e);
        }
        synced?;

        let mut matches = self.store.matches(&player.puuid).await?;
        matches.sort_by(|a, b| stats::compare_match_ids(&b.match_id, &a.match_id));
        matches.truncate(limit);
        Ok(matches)
    }

    /// All ranked match ids this season, in the order Riot returns them, without duplicates.
    ///
    /// Pages hold at most 100 ids; the total ranked games of both queues bounds how many
    /// ids are requested.
    async fn ranked_match_ids(&mut self, player: &ResolvedPlayer) -> Result<Vec<String>, AppError> {
        let entries = self.league_entries(player).await?;
        let games_played: u32 = entries
            .iter()
            .filter(|e| e.queue().is_some())
            .map(|e| e.games_played().max(0) as u32)
            .sum();

        if games_played == 0 {
            debug!("⚔️ No ranked games this season");
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let mut seen = HashSet::new();
        let mut start = 0;

        while start < games_played {
            let count = (games_played - start).min(MATCH_IDS_PAGE_SIZE);
            let page = self
                .riot
                .ranked_match_ids(
                    player.platform,
                    &player.puuid,
                    self.settings.season_start_timestamp,
                    start,
                    count,
                )
                .await?;

            let exhausted = (page.len() as u32) < count;
            ids.extend(page.into_iter().filter(|id| seen.insert(id.clone())));

            if exhausted {
                break;
            }
            start += count;
        }

        Ok(ids)
    }

    /// Fetch one match and store the player's line. `Ok(false)` when nothing was written.
    async fn ingest_match(
        &mut self,
        player: &ResolvedPlayer,
        match_id: &str,
    ) -> Result<bool, AppError> {
        let dto = self.riot.match_by_id(player.platform, match_id).await?;

        let Some(record) = MatchRecord::from_match(&dto, &player.puuid) else {
            warn!(match_id, "⚔️ ⚠️ Player missing from match participants, skipped");
            self.store.skip_match(&player.puuid, match_id).await?;
            return Ok(false);
        };

        self.store.insert_match(&record).await
    }

    /// Recompute aggregates when `force` is set or they no longer cover the stored matches.
    ///
    /// Under [`AggregatePolicy::CreateIfAbsent`] existing rows are frozen, so only a player
    /// with matches and no aggregates at all counts as out of date.
    async fn sync_champion_stats(&mut self, puuid: &str, force: bool) -> Result<(), AppError> {
        if !force {
            let matches = self.store.match_count(puuid).await?;
            let aggregated = self.store.aggregated_match_count(puuid).await?;
            let out_of_date = match self.settings.aggregate_policy {
                AggregatePolicy::Replace => matches != aggregated,
                AggregatePolicy::CreateIfAbsent => matches > 0 && aggregated == 0,
            };
            if !out_of_date {
                return Ok(());
            }
            info!(matches, aggregated, "📊 Champion stats out of date, rebuilding");
        }

        self.recompute_champion_stats(puuid).await?;
        Ok(())
    }

    /// Fold every stored match of the player into champion aggregates.
    #[instrument(skip(self))]
    pub async fn recompute_champion_stats(&mut self, puuid: &str) -> Result<u64, AppError> {
        let matches = self.store.matches(puuid).await?;
        let aggregates = stats::aggregate_champions(&matches);
        let written = self
            .store
            .write_champion_stats(&aggregates, self.settings.aggregate_policy)
            .await?;

        debug!(
            champions = aggregates.len(),
            written,
            policy = ?self.settings.aggregate_policy,
            "📊 Champion stats recomputed"
        );
        Ok(written)
    }

    pub async fn top_champions(
        &mut self,
        puuid: &str,
        limit: usize,
    ) -> Result<Vec<ChampionAggregate>, AppError> {
        self.store.top_champions(puuid, limit).await
    }
}
