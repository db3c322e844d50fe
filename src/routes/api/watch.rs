use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;
use validator::Validate;

use super::{require_tracker, validate};
use crate::{
    ApiResponse, ApiResult, Ctx,
    entities::{EpisodeKey, WatchProgress},
    error::ApiError,
    services::ShowOverview,
    tracker::WatchState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct UserPath {
    #[validate(length(min = 1, max = 64))]
    pub user: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ShowPath {
    #[validate(length(min = 1, max = 64))]
    pub user: String,
    pub id: u64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EpisodePath {
    #[validate(length(min = 1, max = 64))]
    pub user: String,
    pub id: u64,
    pub season: u32,
    pub episode: u32,
}

impl EpisodePath {
    const fn key(&self) -> EpisodeKey {
        EpisodeKey::new(self.id, self.season, self.episode)
    }
}

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    /// Pin the seasonal breakdown to this season
    pub season: Option<u32>,
}

/// 0 = unwatched, 1 = in progress, 2 = watched
#[derive(Debug, Deserialize, Validate)]
pub struct MarkEpisodeRequest {
    #[validate(range(min = 0, max = 2))]
    pub status: i32,
}

/// GET /api/users/{user}/shows/{id}/overview?season=...
async fn get_overview(
    State(ctx): State<Ctx>,
    Path(path): Path<ShowPath>,
    Query(params): Query<OverviewQuery>,
) -> ApiResult<ShowOverview> {
    validate(&path)?;
    let tracker = require_tracker(&ctx)?;
    let overview = tracker.overview(&path.user, path.id, params.season).await?;

    Ok(ApiResponse::ok("Overview retrieved", overview))
}

/// GET /api/users/{user}/watch-state
async fn get_watch_state(
    State(ctx): State<Ctx>,
    Path(path): Path<UserPath>,
) -> ApiResult<WatchState> {
    validate(&path)?;
    let state = WatchProgress::load_watch_state(&ctx.db, &path.user).await?;

    Ok(ApiResponse::ok("Watch state retrieved", state))
}

/// PUT /api/users/{user}/shows/{id}/seasons/{season}/episodes/{episode}
async fn mark_episode(
    State(ctx): State<Ctx>,
    Path(path): Path<EpisodePath>,
    Json(request): Json<MarkEpisodeRequest>,
) -> ApiResult<WatchProgress> {
    validate(&path)?;
    validate(&request)?;

    let progress =
        WatchProgress::set_status(&ctx.db, &path.user, path.key(), request.status).await?;
    tracing::debug!(
        "{} set S{:02}E{:02} of series {} to {}",
        path.user,
        path.season,
        path.episode,
        path.id,
        request.status
    );

    Ok(ApiResponse::ok("Episode updated", progress))
}

/// DELETE /api/users/{user}/shows/{id}/seasons/{season}/episodes/{episode}
async fn clear_episode(
    State(ctx): State<Ctx>,
    Path(path): Path<EpisodePath>,
) -> ApiResult<()> {
    validate(&path)?;

    if !WatchProgress::clear(&ctx.db, &path.user, path.key()).await? {
        return Err(ApiError::NotFound(format!(
            "No progress stored for S{:02}E{:02} of series {}",
            path.season, path.episode, path.id
        ))
        .into());
    }

    Ok(ApiResponse::ok("Episode cleared", ()))
}

pub fn mount() -> Router<Ctx> {
    Router::new()
        .route("/users/{user}/shows/{id}/overview", get(get_overview))
        .route("/users/{user}/watch-state", get(get_watch_state))
        .route(
            "/users/{user}/shows/{id}/seasons/{season}/episodes/{episode}",
            put(mark_episode).delete(clear_episode),
        )
}
