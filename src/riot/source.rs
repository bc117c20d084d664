use async_trait::async_trait;

use super::client::RiotClient;
use super::region::Platform;
use super::types::{AccountDto, LeagueEntryDto, MatchDto, SummonerDto};
use crate::error::AppError;

/// Remote data the reconciliation engine reads from.
///
/// [`RiotClient`] is the production implementation; tests swap in an in-memory fake.
#[async_trait]
pub trait RiotSource: Send + Sync {
    async fn account_by_riot_id(
        &self,
        platform: Platform,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, AppError>;

    async fn summoner_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<SummonerDto, AppError>;

    async fn league_entries(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError>;

    /// One page (at most 100 ids) of ranked match ids since `start_time`.
    async fn ranked_match_ids(
        &self,
        platform: Platform,
        puuid: &str,
        start_time: i64,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, AppError>;

    async fn match_by_id(&self, platform: Platform, match_id: &str) -> Result<MatchDto, AppError>;
}

#[async_trait]
impl RiotSource for RiotClient {
    async fn account_by_riot_id(
        &self,
        platform: Platform,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, AppError> {
        self.get_account_by_riot_id(platform, game_name, tag_line)
            .await
    }

    async fn summoner_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<SummonerDto, AppError> {
        self.get_summoner_by_puuid(platform, puuid).await
    }

    async fn league_entries(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        self.get_league_entries_by_puuid(platform, puuid).await
    }

    async fn ranked_match_ids(
        &self,
        platform: Platform,
        puuid: &str,
        start_time: i64,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, AppError> {
        self.get_ranked_match_ids(platform, puuid, start_time, start, count)
            .await
    }

    async fn match_by_id(&self, platform: Platform, match_id: &str) -> Result<MatchDto, AppError> {
        self.get_match(platform, match_id).await
    }
}
