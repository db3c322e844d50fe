use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use crate::{ApiResponse, ApiResult, Ctx, catalog::CacheStats, error::AppError};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub catalog: bool,
    pub token_exchange: bool,
    pub cache: Option<CacheStats>,
}

/// GET /api/health
async fn health(State(ctx): State<Ctx>) -> ApiResult<HealthResponse> {
    sqlx::query("SELECT 1")
        .execute(&ctx.db)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Health check failed: {e}")))?;

    Ok(ApiResponse::ok(
        "Service is healthy",
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            database: true,
            catalog: ctx.catalog.is_some(),
            token_exchange: ctx.token_exchange.is_some(),
            cache: ctx.catalog.as_ref().map(|c| c.cache_stats()),
        },
    ))
}

pub fn mount() -> Router<Ctx> {
    Router::new().route("/health", get(health))
}
