use serde::Serialize;
use sqlx::{FromRow, Row, sqlite::SqliteRow};

use crate::riot::{LeagueEntryDto, MatchDto, QueueKind};
use crate::stats;

/// Participants stored per match.
pub const PARTICIPANT_SLOTS: usize = 10;

const APEX_TIERS: [&str; 3] = ["MASTER", "GRANDMASTER", "CHALLENGER"];

/// Rank of one queue. `tier == None` means unranked in that queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankSnapshot {
    pub tier: Option<String>,
    pub division: Option<String>,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
    pub win_rate: i64,
}

impl RankSnapshot {
    pub fn from_entry(entry: &LeagueEntryDto) -> Self {
        Self {
            tier: Some(entry.tier.clone()),
            division: Some(entry.rank.clone()),
            league_points: entry.league_points,
            wins: entry.wins,
            losses: entry.losses,
            win_rate: stats::win_rate(entry.wins, entry.losses),
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.tier.is_some()
    }

    /// `GOLD II`, `MASTER` for apex tiers, `Unranked` when no entry exists.
    pub fn label(&self) -> String {
        match (&self.tier, &self.division) {
            (None, _) => "Unranked".to_string(),
            (Some(tier), _) if APEX_TIERS.contains(&tier.as_str()) => tier.clone(),
            (Some(tier), Some(division)) => format!("{tier} {division}"),
            (Some(tier), None) => tier.clone(),
        }
    }

    fn from_row(row: &SqliteRow, prefix: &str) -> sqlx::Result<Self> {
        Ok(Self {
            tier: row.try_get(format!("{prefix}_tier").as_str())?,
            division: row.try_get(format!("{prefix}_division").as_str())?,
            league_points: row.try_get(format!("{prefix}_lp").as_str())?,
            wins: row.try_get(format!("{prefix}_wins").as_str())?,
            losses: row.try_get(format!("{prefix}_losses").as_str())?,
            win_rate: row.try_get(format!("{prefix}_wr").as_str())?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankSnapshotPair {
    pub solo: RankSnapshot,
    pub flex: RankSnapshot,
}

impl RankSnapshotPair {
    /// Classify entries by their queue tag. Riot returns them in no particular order.
    pub fn from_entries(entries: &[LeagueEntryDto]) -> Self {
        let mut pair = Self::default();

        for entry in entries {
            match entry.queue() {
                Some(QueueKind::Solo) => pair.solo = RankSnapshot::from_entry(entry),
                Some(QueueKind::Flex) => pair.flex = RankSnapshot::from_entry(entry),
                None => {}
            }
        }

        pair
    }
}

/// One `summoners` row.
#[derive(Debug, Clone, PartialEq)]
pub struct SummonerRecord {
    pub puuid: String,
    pub summoner_id: Option<String>,
    /// Riot ID (`GameName#TAG`) at the time of the last write.
    pub name: String,
    pub region: String,
    pub profile_icon_id: Option<i32>,
    pub summoner_level: Option<i64>,
    /// Epoch seconds.
    pub last_update: i64,
    pub ranks: RankSnapshotPair,
}

impl FromRow<'_, SqliteRow> for SummonerRecord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            puuid: row.try_get("puuid")?,
            summoner_id: row.try_get("summoner_id")?,
            name: row.try_get("name")?,
            region: row.try_get("region")?,
            profile_icon_id: row.try_get("profile_icon_id")?,
            summoner_level: row.try_get("summoner_level")?,
            last_update: row.try_get("last_update")?,
            ranks: RankSnapshotPair {
                solo: RankSnapshot::from_row(row, "soloq")?,
                flex: RankSnapshot::from_row(row, "flex")?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub name: String,
    pub champion: String,
    pub team_id: i32,
}

/// One `matches` row: the player's own line plus the lobby, frozen at game end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub puuid: String,
    pub match_id: String,
    pub queue_id: i32,
    pub game_mode: String,
    pub game_duration: i64,
    pub champion_name: String,
    pub win: bool,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub kda: f64,
    pub cs: i32,
    pub vision: i32,
    pub spells: [i32; 2],
    pub items: [i32; 7],
    pub participants: Vec<Participant>,
}

impl MatchRecord {
    /// Extract `puuid`'s line from a match. `None` if the player is not in it.
    pub fn from_match(dto: &MatchDto, puuid: &str) -> Option<Self> {
        let me = dto.info.participants.iter().find(|p| p.puuid == puuid)?;

        let participants = dto
            .info
            .participants
            .iter()
            .take(PARTICIPANT_SLOTS)
            .map(|p| Participant {
                name: p.display_name().to_string(),
                champion: p.champion_name.clone(),
                team_id: p.team_id,
            })
            .collect();

        Some(Self {
            puuid: puuid.to_string(),
            match_id: dto.metadata.match_id.clone(),
            queue_id: dto.info.queue_id,
            game_mode: dto.info.game_mode.clone(),
            game_duration: dto.info.game_duration,
            champion_name: me.champion_name.clone(),
            win: me.win,
            kills: me.kills,
            deaths: me.deaths,
            assists: me.assists,
            kda: stats::kda(me.kills as i64, me.deaths as i64, me.assists as i64),
            cs: me.cs_total(),
            vision: me.vision_score,
            spells: [me.summoner1_id, me.summoner2_id],
            items: me.items(),
            participants,
        })
    }
}

impl FromRow<'_, SqliteRow> for MatchRecord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let mut items = [0; 7];
        for (slot, item) in items.iter_mut().enumerate() {
            *item = row.try_get(format!("item{slot}").as_str())?;
        }

        let mut participants = Vec::with_capacity(PARTICIPANT_SLOTS);
        for n in 1..=PARTICIPANT_SLOTS {
            let name: Option<String> = row.try_get(format!("participant{n}_name").as_str())?;
            let champion: Option<String> =
                row.try_get(format!("participant{n}_champion").as_str())?;
            let team_id: Option<i32> = row.try_get(format!("participant{n}_team_id").as_str())?;

            if let (Some(name), Some(champion), Some(team_id)) = (name, champion, team_id) {
                participants.push(Participant {
                    name,
                    champion,
                    team_id,
                });
            }
        }

        Ok(Self {
            puuid: row.try_get("puuid")?,
            match_id: row.try_get("match_id")?,
            queue_id: row.try_get("queue_id")?,
            game_mode: row.try_get("game_mode")?,
            game_duration: row.try_get("game_duration")?,
            champion_name: row.try_get("champion_name")?,
            win: row.try_get("win")?,
            kills: row.try_get("kills")?,
            deaths: row.try_get("deaths")?,
            assists: row.try_get("assists")?,
            kda: row.try_get("kda")?,
            cs: row.try_get("cs")?,
            vision: row.try_get("vision")?,
            spells: [row.try_get("spell1")?, row.try_get("spell2")?],
            items,
            participants,
        })
    }
}

/// One `champion_stats` row, derived from the player's matches on that champion.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ChampionAggregate {
    pub puuid: String,
    pub champion_name: String,
    pub matches_played: i64,
    pub wins: i64,
    pub losses: i64,
    #[sqlx(rename = "wr")]
    pub win_rate: i64,
    pub kda: f64,
    #[sqlx(rename = "kills")]
    pub avg_kills: f64,
    #[sqlx(rename = "deaths")]
    pub avg_deaths: f64,
    #[sqlx(rename = "assists")]
    pub avg_assists: f64,
    #[sqlx(rename = "cs")]
    pub avg_cs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(queue: &str, tier: &str, rank: &str, wins: i32, losses: i32) -> LeagueEntryDto {
        LeagueEntryDto {
            queue_type: queue.into(),
            tier: tier.into(),
            rank: rank.into(),
            league_points: 42,
            wins,
            losses,
        }
    }

    #[test]
    fn entries_are_classified_by_tag_not_position() {
        let entries = vec![
            entry("RANKED_FLEX_SR", "SILVER", "I", 5, 5),
            entry("CHERRY", "GOLD", "I", 1, 0),
            entry("RANKED_SOLO_5x5", "GOLD", "II", 30, 20),
        ];

        let pair = RankSnapshotPair::from_entries(&entries);

        assert_eq!(pair.solo.label(), "GOLD II");
        assert_eq!(pair.solo.win_rate, 60);
        assert_eq!(pair.flex.label(), "SILVER I");
        assert_eq!(pair.flex.win_rate, 50);
    }

    #[test]
    fn missing_queue_defaults_to_unranked() {
        let pair = RankSnapshotPair::from_entries(&[entry("RANKED_SOLO_5x5", "IRON", "IV", 1, 2)]);

        assert!(pair.solo.is_ranked());
        assert!(!pair.flex.is_ranked());
        assert_eq!(pair.flex.label(), "Unranked");
        assert_eq!(pair.flex.win_rate, 0);
        assert_eq!(pair.flex.wins + pair.flex.losses, 0);
    }

    #[test]
    fn apex_tiers_have_no_division() {
        let snapshot = RankSnapshot::from_entry(&entry("RANKED_SOLO_5x5", "CHALLENGER", "I", 1, 1));
        assert_eq!(snapshot.label(), "CHALLENGER");
    }
}
