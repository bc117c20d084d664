use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::{Platform, Routing};
use crate::riot::types::SummonerDto;

impl RiotClient {
    /// Get summoner by PUUID (profile icon, level, encrypted summoner id)
    pub async fn get_summoner_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<SummonerDto, AppError> {
        let path = format!("/lol/summoner/v4/summoners/by-puuid/{puuid}");

        self.get(platform, Routing::Platform, &path, &[]).await
    }
}
