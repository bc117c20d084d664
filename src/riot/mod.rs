mod client;
mod endpoints;
mod region;
mod source;
mod types;

pub use client::RiotClient;
pub use endpoints::MATCH_IDS_PAGE_SIZE;
pub use region::{Platform, Region, Routing};
pub use source::RiotSource;
pub use types::{
    AccountDto, InfoDto, LeagueEntryDto, MatchDto, MetadataDto, ParticipantDto, QueueKind,
    SummonerDto,
};
