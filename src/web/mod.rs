//! HTTP surface: one JSON profile page per player plus an explicit rank refresh.

mod view;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{error, info, instrument, warn};

pub use view::{SummonerPage, game_type};

use crate::config::ReconcileSettings;
use crate::error::AppError;
use crate::reconcile::{PlayerIdentity, Reconciler, UpsertOutcome};
use crate::riot::RiotSource;

/// Shared by every request. Each request opens its own [`Reconciler`] from it.
pub struct AppState {
    pub pool: SqlitePool,
    pub riot: Arc<dyn RiotSource>,
    pub settings: ReconcileSettings,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pool", &self.pool)
            .field("riot", &"<RiotSource>")
            .field("settings", &self.settings)
            .finish()
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/summoners/:platform/:riot_id", get(summoner_page))
        .route("/summoners/:platform/:riot_id/refresh", post(refresh_ranks))
        .with_state(state)
}

/// Error body returned by every route.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::PlayerNotFound { .. } | AppError::InvalidRiotId(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRegion(_) => StatusCode::BAD_REQUEST,
            e if e.is_remote_fetch() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = ?self.0, status = status.as_u16(), "🌐 ❌ Request failed");
        } else {
            warn!(error = %self.0, status = status.as_u16(), "🌐 ⚠️ Request rejected");
        }

        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Accept `Name#TAG` (percent-encoded) as well as the URL friendly `Name-TAG`.
fn identity_from_path(platform: &str, riot_id: &str) -> Result<PlayerIdentity, AppError> {
    if riot_id.contains('#') {
        return PlayerIdentity::parse(riot_id, platform);
    }

    match riot_id.rsplit_once('-') {
        Some((name, tag)) => PlayerIdentity::parse(&format!("{name}#{tag}"), platform),
        None => Err(AppError::InvalidRiotId(riot_id.to_string())),
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true, "service": env!("CARGO_PKG_NAME") }))
}

#[instrument(skip(state))]
async fn summoner_page(
    State(state): State<Arc<AppState>>,
    Path((platform, riot_id)): Path<(String, String)>,
) -> Result<Json<SummonerPage>, ApiError> {
    let identity = identity_from_path(&platform, &riot_id)?;

    let mut reconciler =
        Reconciler::open(&state.pool, state.riot.as_ref(), state.settings.clone()).await?;
    let profile = reconciler.profile(&identity).await?;

    info!(
        puuid = %profile.player.puuid,
        matches = profile.recent_matches.len(),
        champions = profile.top_champions.len(),
        "🌐 Profile served"
    );

    Ok(Json(SummonerPage::from(&profile)))
}

#[derive(Debug, Serialize)]
struct RefreshResponse {
    puuid: String,
    outcome: UpsertOutcome,
}

#[instrument(skip(state))]
async fn refresh_ranks(
    State(state): State<Arc<AppState>>,
    Path((platform, riot_id)): Path<(String, String)>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let identity = identity_from_path(&platform, &riot_id)?;

    let mut reconciler =
        Reconciler::open(&state.pool, state.riot.as_ref(), state.settings.clone()).await?;
    let player = reconciler.resolve(&identity).await?;
    let outcome = reconciler.refresh_rank_data(&player).await?;

    Ok(Json(RefreshResponse {
        puuid: player.puuid,
        outcome,
    }))
}
