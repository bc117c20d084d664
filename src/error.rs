use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database schema mismatch: table {table} is missing column {column}")]
    Schema { table: &'static str, column: String },

    #[error("Riot API error: {status} - {message}")]
    RiotApi { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Player not found: {game_name}#{tag_line}")]
    PlayerNotFound { game_name: String, tag_line: String },

    #[error("Invalid Riot ID: {0} (expected GameName#TAG)")]
    InvalidRiotId(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Remote failures, as opposed to identity or store failures.
    pub fn is_remote_fetch(&self) -> bool {
        matches!(self, AppError::RiotApi { .. } | AppError::Http(_))
    }
}
