use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use validator::Validate;

use super::{require_catalog, require_tracker, validate};
use crate::{
    ApiResponse, ApiResult, Ctx,
    services::tracker::{SeasonListing, StatusView},
};

#[derive(Debug, Deserialize, Validate)]
pub struct SeasonQuery {
    /// Include this user's watched flags
    #[validate(length(min = 1, max = 64))]
    pub user: Option<String>,
}

/// GET /api/shows/{id}/status
async fn get_status(State(ctx): State<Ctx>, Path(id): Path<u64>) -> ApiResult<StatusView> {
    let tracker = require_tracker(&ctx)?;
    let view = tracker.status(id).await?;

    Ok(ApiResponse::ok("Status resolved", view))
}

/// GET /api/shows/{id}/seasons/{season}?user=...
async fn get_season(
    State(ctx): State<Ctx>,
    Path((id, season)): Path<(u64, u32)>,
    Query(params): Query<SeasonQuery>,
) -> ApiResult<SeasonListing> {
    validate(&params)?;
    let tracker = require_tracker(&ctx)?;
    let listing = tracker.season(id, season, params.user.as_deref()).await?;

    Ok(ApiResponse::ok("Season retrieved", listing))
}

/// POST /api/shows/{id}/refresh
///
/// Drops cached catalog snapshots so the next read fetches fresh data.
async fn refresh(State(ctx): State<Ctx>, Path(id): Path<u64>) -> ApiResult<()> {
    let catalog = require_catalog(&ctx)?;
    catalog.refresh(id).await;

    Ok(ApiResponse::ok("Series refreshed", ()))
}

pub fn mount() -> Router<Ctx> {
    Router::new()
        .route("/shows/{id}/status", get(get_status))
        .route("/shows/{id}/seasons/{season}", get(get_season))
        .route("/shows/{id}/refresh", post(refresh))
}
