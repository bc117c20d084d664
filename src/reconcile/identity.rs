use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::db::{RankSnapshotPair, SummonerRecord};
use crate::error::AppError;
use crate::riot::Platform;

/// `GameName#TAG`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl FromStr for RiotId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (game_name, tag_line) = s
            .rsplit_once('#')
            .ok_or_else(|| AppError::InvalidRiotId(s.to_string()))?;
        let (game_name, tag_line) = (game_name.trim(), tag_line.trim());

        if game_name.is_empty() || tag_line.is_empty() {
            return Err(AppError::InvalidRiotId(s.to_string()));
        }

        Ok(Self {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        })
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

/// What a caller knows about a player before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub riot_id: RiotId,
    pub platform: Platform,
}

impl PlayerIdentity {
    pub fn parse(riot_id: &str, platform: &str) -> Result<Self, AppError> {
        Ok(Self {
            riot_id: riot_id.parse()?,
            platform: platform.parse()?,
        })
    }
}

/// A player keyed by puuid, the only identifier cached data is joined on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlayer {
    pub puuid: String,
    #[serde(skip)]
    pub summoner_id: Option<String>,
    pub riot_id: RiotId,
    pub platform: Platform,
    pub profile_icon_id: Option<i32>,
    pub summoner_level: Option<i64>,
}

impl ResolvedPlayer {
    pub(crate) fn from_record(record: &SummonerRecord, platform: Platform) -> Result<Self, AppError> {
        Ok(Self {
            puuid: record.puuid.clone(),
            summoner_id: record.summoner_id.clone(),
            riot_id: record.name.parse()?,
            platform,
            profile_icon_id: record.profile_icon_id,
            summoner_level: record.summoner_level,
        })
    }

    pub(crate) fn to_record(&self, ranks: RankSnapshotPair, last_update: i64) -> SummonerRecord {
        SummonerRecord {
            puuid: self.puuid.clone(),
            summoner_id: self.summoner_id.clone(),
            name: self.riot_id.to_string(),
            region: self.platform.to_string(),
            profile_icon_id: self.profile_icon_id,
            summoner_level: self.summoner_level,
            last_update,
            ranks,
        }
    }
}
