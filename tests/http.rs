//! In-process tests of the HTTP routes, driven through `tower::ServiceExt::oneshot`.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{FakeRiot, PUUID, league_entry};
use http_body_util::BodyExt;
use lolprofile::config::ReconcileSettings;
use lolprofile::db;
use lolprofile::riot::RiotSource;
use lolprofile::web::{AppState, build_router};
use tower::ServiceExt;

async fn make_router(riot: FakeRiot) -> axum::Router {
    let state = Arc::new(AppState {
        pool: db::open_in_memory().await.unwrap(),
        riot: Arc::new(riot) as Arc<dyn RiotSource>,
        settings: ReconcileSettings::default(),
    });
    build_router(state)
}

async fn call(router: axum::Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).expect("body is not JSON"))
}

fn ranked_riot() -> FakeRiot {
    FakeRiot::new()
        .with_league(vec![
            league_entry("RANKED_SOLO_5x5", "GOLD", "II", 1, 1),
            league_entry("RANKED_FLEX_SR", "MASTER", "I", 1, 0),
        ])
        .with_matches(&[
            ("EUW1_3", "Ahri", true),
            ("EUW1_2", "Lux", false),
            ("EUW1_1", "Ahri", true),
        ])
}

#[tokio::test]
async fn health_returns_ok() {
    let router = make_router(FakeRiot::new()).await;
    let (status, body) = call(router, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn summoner_page_renders_profile() {
    let router = make_router(ranked_riot()).await;
    let (status, body) = call(router, "GET", "/summoners/euw/Chalop-3012").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summoner_name"], "Chalop#3012");
    assert_eq!(body["puuid"], PUUID);
    assert_eq!(body["platform"], "EUW1");
    assert_eq!(body["soloq"]["rank"], "Gold II");
    assert_eq!(body["soloq"]["wr"], 50);
    assert_eq!(body["flex"]["rank"], "Master");

    let matches = body["recent_matches"].as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0]["match_id"], "EUW1_3");
    assert_eq!(matches[0]["game_type"], "Ranked Solo");
    assert_eq!(matches[0]["game_duration"], "30:05");
    assert_eq!(matches[0]["blue_team"].as_array().unwrap().len(), 5);

    let champions = body["champions_played"].as_array().unwrap();
    assert_eq!(champions[0]["champion_name"], "Ahri");
    assert_eq!(champions[0]["games_played"], 2);
}

#[tokio::test]
async fn encoded_hash_is_accepted() {
    let router = make_router(ranked_riot()).await;
    let (status, body) = call(router, "GET", "/summoners/EUW1/Chalop%233012").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["puuid"], PUUID);
}

#[tokio::test]
async fn unknown_player_is_404() {
    let router = make_router(FakeRiot::new()).await;
    let (status, body) = call(router, "GET", "/summoners/euw/Nobody-0000").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Nobody#0000"));
}

#[tokio::test]
async fn malformed_riot_id_is_404() {
    let router = make_router(FakeRiot::new()).await;
    let (status, _) = call(router, "GET", "/summoners/euw/nobody").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_platform_is_400() {
    let router = make_router(FakeRiot::new()).await;
    let (status, _) = call(router, "GET", "/summoners/mars/Chalop-3012").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failing_match_fetch_is_502() {
    let router = make_router(ranked_riot().with_failing_match("EUW1_2")).await;
    let (status, _) = call(router, "GET", "/summoners/euw/Chalop-3012").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn refresh_inserts_then_reports_up_to_date() {
    let router = make_router(ranked_riot()).await;

    let (status, body) = call(router.clone(), "POST", "/summoners/euw/Chalop-3012/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "inserted");

    let (status, body) = call(router, "POST", "/summoners/euw/Chalop-3012/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "up_to_date");
}
