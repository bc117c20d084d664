use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::{Platform, Routing};
use crate::riot::types::MatchDto;

/// Largest `count` the match ids endpoint accepts.
pub const MATCH_IDS_PAGE_SIZE: u32 = 100;

impl RiotClient {
    /// Get one page of ranked match IDs played since `start_time` (epoch seconds).
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_ranked_match_ids(
        &self,
        platform: Platform,
        puuid: &str,
        start_time: i64,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, AppError> {
        let path = format!("/lol/match/v5/matches/by-puuid/{puuid}/ids");
        let query = [
            ("type", "ranked".to_string()),
            ("startTime", start_time.to_string()),
            ("start", start.to_string()),
            ("count", count.min(MATCH_IDS_PAGE_SIZE).to_string()),
        ];

        self.get(platform, Routing::Regional, &path, &query).await
    }

    /// Get match details by match ID
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match(&self, platform: Platform, match_id: &str) -> Result<MatchDto, AppError> {
        let path = format!("/lol/match/v5/matches/{match_id}");

        self.get(platform, Routing::Regional, &path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use httpmock::prelude::*;

    use super::*;

    #[tokio::test]
    async fn ranked_ids_query_is_clamped_to_one_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/lol/match/v5/matches/by-puuid/p1/ids")
                    .query_param("type", "ranked")
                    .query_param("startTime", "1767830400")
                    .query_param("start", "200")
                    .query_param("count", "100");
                then.status(200).json_body(serde_json::json!(["EUW1_3"]));
            })
            .await;

        let client = RiotClient::new("k".into(), NonZeroU32::MIN).with_base_url(server.base_url());
        let ids = client
            .get_ranked_match_ids(Platform::EUW1, "p1", 1_767_830_400, 200, 250)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(ids, vec!["EUW1_3"]);
    }
}
