//! Cache and reconciliation engine for League of Legends player statistics.
//!
//! Ranks, ranked match history and per-champion aggregates are served from SQLite and
//! merged with the Riot API only when the cached rows are missing or stale.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod riot;
pub mod stats;
pub mod web;
