//! In-memory Riot API used by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use lolprofile::error::AppError;
use lolprofile::reconcile::Clock;
use lolprofile::riot::{AccountDto, LeagueEntryDto, MatchDto, Platform, RiotSource, SummonerDto};
use serde_json::json;

pub const PUUID: &str = "puuid-chalop";
pub const GAME_NAME: &str = "Chalop";
pub const TAG_LINE: &str = "3012";

/// Clock frozen at a chosen epoch second.
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

/// Calls the engine made, in order.
#[derive(Debug, Default)]
pub struct Calls {
    pub accounts: usize,
    pub summoners: usize,
    pub league_entries: usize,
    /// `(start, count)` of every match-id page.
    pub id_pages: Vec<(u32, u32)>,
    pub matches: Vec<String>,
}

pub struct FakeRiot {
    pub league: Vec<LeagueEntryDto>,
    /// Newest first, as Riot returns them.
    pub match_ids: Vec<String>,
    pub matches: HashMap<String, MatchDto>,
    pub failing_matches: HashSet<String>,
    pub calls: Mutex<Calls>,
}

impl FakeRiot {
    pub fn new() -> Self {
        Self {
            league: Vec::new(),
            match_ids: Vec::new(),
            matches: HashMap::new(),
            failing_matches: HashSet::new(),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn with_league(mut self, entries: Vec<LeagueEntryDto>) -> Self {
        self.league = entries;
        self
    }

    /// Register matches, newest first. Each is a `(match_id, champion, win)` line of [`PUUID`].
    pub fn with_matches(mut self, lines: &[(&str, &str, bool)]) -> Self {
        for (match_id, champion, win) in lines {
            self.match_ids.push(match_id.to_string());
            self.matches
                .insert(match_id.to_string(), match_dto(match_id, champion, *win, 5, 2, 8));
        }
        self
    }

    pub fn with_failing_match(mut self, match_id: &str) -> Self {
        self.failing_matches.insert(match_id.to_string());
        self
    }

    pub fn fetched_matches(&self) -> Vec<String> {
        self.calls.lock().unwrap().matches.clone()
    }

    pub fn id_pages(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().id_pages.clone()
    }

    pub fn league_calls(&self) -> usize {
        self.calls.lock().unwrap().league_entries
    }

    pub fn account_calls(&self) -> usize {
        self.calls.lock().unwrap().accounts
    }
}

#[async_trait]
impl RiotSource for FakeRiot {
    async fn account_by_riot_id(
        &self,
        _platform: Platform,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, AppError> {
        self.calls.lock().unwrap().accounts += 1;

        if game_name.eq_ignore_ascii_case(GAME_NAME) && tag_line.eq_ignore_ascii_case(TAG_LINE) {
            Ok(AccountDto {
                puuid: PUUID.to_string(),
                game_name: Some(GAME_NAME.to_string()),
                tag_line: Some(TAG_LINE.to_string()),
            })
        } else {
            Err(AppError::PlayerNotFound {
                game_name: game_name.to_string(),
                tag_line: tag_line.to_string(),
            })
        }
    }

    async fn summoner_by_puuid(
        &self,
        _platform: Platform,
        _puuid: &str,
    ) -> Result<SummonerDto, AppError> {
        self.calls.lock().unwrap().summoners += 1;
        Ok(SummonerDto {
            id: Some("summoner-chalop".to_string()),
            profile_icon_id: 4568,
            summoner_level: 312,
        })
    }

    async fn league_entries(
        &self,
        _platform: Platform,
        _puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        self.calls.lock().unwrap().league_entries += 1;
        Ok(self.league.clone())
    }

    async fn ranked_match_ids(
        &self,
        _platform: Platform,
        _puuid: &str,
        _start_time: i64,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, AppError> {
        self.calls.lock().unwrap().id_pages.push((start, count));
        Ok(self
            .match_ids
            .iter()
            .skip(start as usize)
            .take(count as usize)
            .cloned()
            .collect())
    }

    async fn match_by_id(&self, _platform: Platform, match_id: &str) -> Result<MatchDto, AppError> {
        self.calls.lock().unwrap().matches.push(match_id.to_string());

        if self.failing_matches.contains(match_id) {
            return Err(AppError::RiotApi {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }

        self.matches
            .get(match_id)
            .cloned()
            .ok_or_else(|| AppError::RiotApi {
                status: 404,
                message: format!("match {match_id} not found"),
            })
    }
}

pub fn league_entry(queue: &str, tier: &str, rank: &str, wins: i32, losses: i32) -> LeagueEntryDto {
    LeagueEntryDto {
        queue_type: queue.to_string(),
        tier: tier.to_string(),
        rank: rank.to_string(),
        league_points: 57,
        wins,
        losses,
    }
}

/// A ten player ranked solo match where [`PUUID`] plays `champion` on the blue side.
pub fn match_dto(
    match_id: &str,
    champion: &str,
    win: bool,
    kills: i32,
    deaths: i32,
    assists: i32,
) -> MatchDto {
    let participants: Vec<_> = (0..10)
        .map(|slot| {
            let me = slot == 0;
            let blue = slot < 5;
            json!({
                "puuid": if me { PUUID.to_string() } else { format!("puuid-{slot}") },
                "riotIdGameName": if me { GAME_NAME.to_string() } else { format!("Player{slot}") },
                "championName": if me { champion.to_string() } else { "Garen".to_string() },
                "teamId": if blue { 100 } else { 200 },
                "kills": if me { kills } else { 1 },
                "deaths": if me { deaths } else { 1 },
                "assists": if me { assists } else { 1 },
                "totalMinionsKilled": 150,
                "neutralMinionsKilled": 12,
                "visionScore": 20,
                "win": if blue { win } else { !win },
                "summoner1Id": 4,
                "summoner2Id": 14,
                "item0": 3157, "item1": 3020, "item2": 0, "item3": 0,
                "item4": 0, "item5": 0, "item6": 3340,
            })
        })
        .collect();

    serde_json::from_value(json!({
        "metadata": { "matchId": match_id },
        "info": {
            "gameDuration": 1805,
            "gameMode": "CLASSIC",
            "queueId": 420,
            "participants": participants,
        }
    }))
    .expect("valid match fixture")
}
