mod account;
mod league;
mod match_v5;
mod summoner;

pub use match_v5::MATCH_IDS_PAGE_SIZE;
