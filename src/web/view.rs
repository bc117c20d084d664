//! JSON page model served for a player profile.

use serde::Serialize;

use crate::db::{ChampionAggregate, MatchRecord, Participant, RankSnapshot};
use crate::reconcile::PlayerProfile;

const BLUE_TEAM_ID: i32 = 100;

/// Human readable label of a queue id.
pub fn game_type(queue_id: i32) -> &'static str {
    match queue_id {
        400 => "Normal Draft",
        420 => "Ranked Solo",
        430 => "Normal Blind",
        440 => "Ranked Flex",
        450 => "ARAM",
        700 => "Clash",
        830 | 840 | 850 => "Co-op vs AI",
        900 => "URF",
        _ => "Unknown",
    }
}

/// `GOLD II` -> `Gold II`. Divisions stay roman.
fn display_rank(snapshot: &RankSnapshot) -> String {
    let label = snapshot.label();
    if !snapshot.is_ranked() {
        return label;
    }

    let (tier, rest) = label.split_once(' ').unwrap_or((label.as_str(), ""));
    let mut chars = tier.chars();
    let tier = match chars.next() {
        Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
        None => String::new(),
    };

    if rest.is_empty() {
        tier
    } else {
        format!("{tier} {rest}")
    }
}

fn duration_formatted(game_duration: i64) -> String {
    format!("{}:{:02}", game_duration / 60, game_duration % 60)
}

#[derive(Debug, Serialize)]
pub struct RankView {
    pub rank: String,
    pub lp: i32,
    pub wins: i32,
    pub losses: i32,
    pub wr: i64,
}

impl From<&RankSnapshot> for RankView {
    fn from(snapshot: &RankSnapshot) -> Self {
        Self {
            rank: display_rank(snapshot),
            lp: snapshot.league_points,
            wins: snapshot.wins,
            losses: snapshot.losses,
            wr: snapshot.win_rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChampionView {
    pub champion_name: String,
    pub games_played: i64,
    pub wr: i64,
    pub kda: f64,
    pub kills: f64,
    pub deaths: f64,
    pub assists: f64,
    pub cs: i64,
}

impl From<&ChampionAggregate> for ChampionView {
    fn from(aggregate: &ChampionAggregate) -> Self {
        Self {
            champion_name: aggregate.champion_name.clone(),
            games_played: aggregate.matches_played,
            wr: aggregate.win_rate,
            kda: aggregate.kda,
            kills: aggregate.avg_kills,
            deaths: aggregate.avg_deaths,
            assists: aggregate.avg_assists,
            cs: aggregate.avg_cs,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchView {
    pub match_id: String,
    pub game_type: &'static str,
    pub game_mode: String,
    pub queue_id: i32,
    pub game_duration: String,
    pub win: bool,
    pub champion_name: String,
    pub score: String,
    pub kda: f64,
    pub cs: i32,
    pub vision: i32,
    pub item_ids: [i32; 7],
    pub summoner_spell_ids: [i32; 2],
    pub blue_team: Vec<Participant>,
    pub red_team: Vec<Participant>,
}

impl From<&MatchRecord> for MatchView {
    fn from(record: &MatchRecord) -> Self {
        let (blue_team, red_team) = record
            .participants
            .iter()
            .cloned()
            .partition(|p| p.team_id == BLUE_TEAM_ID);

        Self {
            match_id: record.match_id.clone(),
            game_type: game_type(record.queue_id),
            game_mode: record.game_mode.clone(),
            queue_id: record.queue_id,
            game_duration: duration_formatted(record.game_duration),
            win: record.win,
            champion_name: record.champion_name.clone(),
            score: format!("{}/{}/{}", record.kills, record.deaths, record.assists),
            kda: record.kda,
            cs: record.cs,
            vision: record.vision,
            item_ids: record.items,
            summoner_spell_ids: record.spells,
            blue_team,
            red_team,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummonerPage {
    pub summoner_name: String,
    pub puuid: String,
    pub platform: String,
    pub profile_icon_id: Option<i32>,
    pub summoner_level: Option<i64>,
    pub soloq: RankView,
    pub flex: RankView,
    pub champions_played: Vec<ChampionView>,
    pub recent_matches: Vec<MatchView>,
}

impl From<&PlayerProfile> for SummonerPage {
    fn from(profile: &PlayerProfile) -> Self {
        Self {
            summoner_name: profile.player.riot_id.to_string(),
            puuid: profile.player.puuid.clone(),
            platform: profile.player.platform.to_string(),
            profile_icon_id: profile.player.profile_icon_id,
            summoner_level: profile.player.summoner_level,
            soloq: RankView::from(&profile.ranks.solo),
            flex: RankView::from(&profile.ranks.flex),
            champions_played: profile.top_champions.iter().map(ChampionView::from).collect(),
            recent_matches: profile.recent_matches.iter().map(MatchView::from).collect(),
        }
    }
}
