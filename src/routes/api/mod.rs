use axum::Router;
use std::sync::Arc;

use crate::{
    Ctx,
    catalog::Catalog,
    error::{ApiError, AppError},
    services::TrackerService,
};

pub mod auth;
pub mod catalog;
pub mod health;
pub mod lists;
pub mod shows;
pub mod watch;

/// Mount all API routes
pub fn mount() -> Router<Ctx> {
    Router::new()
        .merge(health::mount())
        .merge(catalog::mount())
        .merge(shows::mount())
        .merge(watch::mount())
        .merge(lists::mount())
        .merge(auth::mount())
}

pub(crate) fn require_catalog(ctx: &Ctx) -> Result<&Arc<Catalog>, AppError> {
    ctx.catalog
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("Catalog not available".to_string()).into())
}

pub(crate) fn require_tracker(ctx: &Ctx) -> Result<&Arc<TrackerService>, AppError> {
    ctx.tracker
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("Catalog not available".to_string()).into())
}

/// Surface the first validation failure as a 400
pub(crate) fn validate<T: validator::Validate>(value: &T) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Invalid request: {e}")).into())
}
