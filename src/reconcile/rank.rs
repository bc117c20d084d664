use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{Reconciler, ResolvedPlayer};
use crate::db::{RankSnapshotPair, SummonerRecord};
use crate::error::AppError;

/// Result of an explicit rank refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    UpToDate,
}

impl Reconciler<'_> {
    /// Cached ranks, fetched and stored only when the player has no row yet.
    ///
    /// An existing row is returned as-is however old it is; refreshing goes through
    /// [`Reconciler::upsert_rank_data`].
    #[instrument(skip_all, fields(puuid = %player.puuid))]
    pub async fn get_rank_data(
        &mut self,
        player: &ResolvedPlayer,
    ) -> Result<RankSnapshotPair, AppError> {
        if let Some(record) = self.store.summoner(&player.puuid).await? {
            debug!(last_update = record.last_update, "🏅 Serving cached ranks");
            return Ok(record.ranks);
        }

        let entries = self.league_entries(player).await?;
        let ranks = RankSnapshotPair::from_entries(&entries);
        let record = player.to_record(ranks.clone(), self.clock.now());

        if self.store.insert_summoner(&record).await? {
            info!(
                solo = %ranks.solo.label(),
                flex = %ranks.flex.label(),
                "🏅 Inserted new summoner"
            );
        } else {
            debug!("🏅 Summoner row appeared concurrently, keeping it");
        }

        Ok(ranks)
    }

    /// Write `fresh` if the stored row is missing or at least one staleness window old.
    #[instrument(skip_all, fields(puuid = %player.puuid))]
    pub async fn upsert_rank_data(
        &mut self,
        player: &ResolvedPlayer,
        fresh: &RankSnapshotPair,
    ) -> Result<UpsertOutcome, AppError> {
        let now = self.clock.now();
        let record = player.to_record(fresh.clone(), now);

        match self.store.summoner(&player.puuid).await? {
            None => {
                if self.store.insert_summoner(&record).await? {
                    info!("🏅 Inserted new summoner");
                    Ok(UpsertOutcome::Inserted)
                } else {
                    Ok(UpsertOutcome::UpToDate)
                }
            }
            Some(existing) if self.is_fresh(&existing, now) => {
                debug!(age_secs = now - existing.last_update, "🏅 Summoner is up to date");
                Ok(UpsertOutcome::UpToDate)
            }
            Some(existing) => {
                self.store.update_summoner(&record).await?;
                info!(age_secs = now - existing.last_update, "🏅 Updated summoner ranks");
                Ok(UpsertOutcome::Updated)
            }
        }
    }

    /// Fetch ranks and upsert them, skipping the remote call while the row is fresh.
    pub async fn refresh_rank_data(
        &mut self,
        player: &ResolvedPlayer,
    ) -> Result<UpsertOutcome, AppError> {
        if let Some(existing) = self.store.summoner(&player.puuid).await? {
            if self.is_fresh(&existing, self.clock.now()) {
                return Ok(UpsertOutcome::UpToDate);
            }
        }

        let entries = self.league_entries(player).await?;
        let fresh = RankSnapshotPair::from_entries(&entries);
        self.upsert_rank_data(player, &fresh).await
    }

    pub(super) fn is_fresh(&self, record: &SummonerRecord, now: i64) -> bool {
        now - record.last_update < self.settings.rank_staleness_secs
    }
}
