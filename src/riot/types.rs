use serde::Deserialize;

// ============================================================================
// Account-v1
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

// ============================================================================
// Summoner-v4
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    /// Encrypted summoner id. Riot stopped sending it for some shards.
    #[serde(default)]
    pub id: Option<String>,
    pub profile_icon_id: i32,
    pub summoner_level: i64,
}

// ============================================================================
// League-v4
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    Solo,
    Flex,
}

impl QueueKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "RANKED_SOLO_5x5" => Some(Self::Solo),
            "RANKED_FLEX_SR" => Some(Self::Flex),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i32,
    pub wins: i32,
    pub losses: i32,
}

impl LeagueEntryDto {
    /// Queue classified by its tag; `None` for queues we do not track (TFT, arena, ...).
    pub fn queue(&self) -> Option<QueueKind> {
        QueueKind::from_tag(&self.queue_type)
    }

    pub fn games_played(&self) -> i32 {
        self.wins + self.losses
    }
}

// ============================================================================
// Match-v5
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub metadata: MetadataDto,
    pub info: InfoDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub match_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoDto {
    pub game_duration: i64,
    pub game_mode: String,
    pub participants: Vec<ParticipantDto>,
    pub queue_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    #[serde(default)]
    pub riot_id_game_name: Option<String>,
    #[serde(default)]
    pub summoner_name: String,
    pub champion_name: String,
    pub team_id: i32,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub total_minions_killed: i32,
    pub neutral_minions_killed: i32,
    pub vision_score: i32,
    pub win: bool,
    pub summoner1_id: i32,
    pub summoner2_id: i32,
    // Items (6 slots + ward)
    pub item0: i32,
    pub item1: i32,
    pub item2: i32,
    pub item3: i32,
    pub item4: i32,
    pub item5: i32,
    pub item6: i32,
}

impl ParticipantDto {
    /// Riot ID game name when present, legacy summoner name otherwise.
    pub fn display_name(&self) -> &str {
        match self.riot_id_game_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.summoner_name,
        }
    }

    pub fn cs_total(&self) -> i32 {
        self.total_minions_killed + self.neutral_minions_killed
    }

    /// Returns all item IDs (0 = empty slot)
    pub fn items(&self) -> [i32; 7] {
        [
            self.item0, self.item1, self.item2, self.item3, self.item4, self.item5, self.item6,
        ]
    }
}
