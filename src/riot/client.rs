use std::{fmt, num::NonZeroU32, sync::Arc};

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::trace;

use super::region::{Platform, Routing};
use crate::error::AppError;

/// Thin Riot API client: one GET helper plus typed endpoints in `endpoints/`.
#[derive(Clone)]
pub struct RiotClient {
    http: reqwest::Client,
    limiter: Arc<DefaultDirectRateLimiter>,
    /// Riot API Key
    key: String,
    /// Replaces `https://{host}` in every URL. Used to point the client at a mock server.
    base_url: Option<String>,
}

impl fmt::Debug for RiotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiotClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RiotClient {
    pub fn new(key: String, rate_limit_per_second: NonZeroU32) -> Self {
        let quota = Quota::per_second(rate_limit_per_second);

        Self {
            http: reqwest::Client::new(),
            limiter: Arc::new(RateLimiter::direct(quota)),
            key,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn url(&self, platform: Platform, routing: Routing, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => {
                let host = match routing {
                    Routing::Platform => platform.host(),
                    Routing::Regional => platform.to_region().host(),
                    Routing::Account => platform.account_region().host(),
                };
                format!("https://{host}{path}")
            }
        }
    }

    /// Issue a GET against `path` on the platform or regional host and decode the JSON body.
    ///
    /// Any non-200 answer becomes [`AppError::RiotApi`] carrying the status and body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        platform: Platform,
        routing: Routing,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = self.url(platform, routing, path);

        self.limiter.until_ready().await;
        trace!(%url, ?query, "riot GET");

        let res = self
            .http
            .get(&url)
            .query(query)
            .header("X-Riot-Token", &self.key)
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => Ok(res.json().await?),
            status => {
                let message = res.text().await.unwrap_or_default();
                Err(AppError::RiotApi {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use httpmock::prelude::*;

    use super::*;

    fn client(server: &MockServer) -> RiotClient {
        RiotClient::new("RGAPI-TEST".into(), NonZeroU32::new(100).unwrap())
            .with_base_url(server.base_url())
    }

    #[test]
    fn url_uses_platform_or_regional_host() {
        let client = RiotClient::new("k".into(), NonZeroU32::MIN);
        assert_eq!(
            client.url(Platform::EUW1, Routing::Platform, "/lol/x"),
            "https://euw1.api.riotgames.com/lol/x"
        );
        assert_eq!(
            client.url(Platform::EUW1, Routing::Regional, "/lol/x"),
            "https://europe.api.riotgames.com/lol/x"
        );
        assert_eq!(
            client.url(Platform::OC1, Routing::Regional, "/lol/x"),
            "https://sea.api.riotgames.com/lol/x"
        );
        assert_eq!(
            client.url(Platform::OC1, Routing::Account, "/riot/x"),
            "https://asia.api.riotgames.com/riot/x"
        );
    }

    #[tokio::test]
    async fn get_sends_key_and_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/lol/match/v5/matches/by-puuid/abc/ids")
                    .header("X-Riot-Token", "RGAPI-TEST")
                    .query_param("start", "100");
                then.status(200).json_body(serde_json::json!(["EUW1_1", "EUW1_2"]));
            })
            .await;

        let ids: Vec<String> = client(&server)
            .get(
                Platform::EUW1,
                Routing::Regional,
                "/lol/match/v5/matches/by-puuid/abc/ids",
                &[("start", "100".to_string())],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(ids, vec!["EUW1_1", "EUW1_2"]);
    }

    #[tokio::test]
    async fn get_maps_status_to_riot_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/forbidden");
                then.status(403).body("Forbidden");
            })
            .await;

        let res: Result<serde_json::Value, _> = client(&server)
            .get(Platform::EUW1, Routing::Platform, "/forbidden", &[])
            .await;

        match res {
            Err(AppError::RiotApi { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_propagates_transport_error() {
        let client = RiotClient::new("k".into(), NonZeroU32::MIN).with_base_url("ht!tp://invalid");
        let res: Result<serde_json::Value, _> =
            client.get(Platform::EUW1, Routing::Platform, "/x", &[]).await;

        assert!(matches!(res, Err(AppError::Http(_))));
    }
}
