use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{require_catalog, validate};
use crate::{
    ApiResponse, ApiResult, Ctx,
    catalog::{CatalogItem, MediaType, MovieDetails},
    error::ApiError,
};

const DEFAULT_LIMIT: usize = 20;

/// Search request parameters
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, max = 200))]
    pub query: String,
    pub year: Option<i32>,
    /// movie or tv; both when absent
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<CatalogItem>,
    pub total: usize,
}

/// GET /api/catalog/search?query=...&year=...&type=...&limit=...
async fn search(
    State(ctx): State<Ctx>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    validate(&params)?;
    let catalog = require_catalog(&ctx)?;

    let media_type = match params.media_type.as_deref() {
        Some(raw) => Some(
            MediaType::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown media type: {raw}")))?,
        ),
        None => None,
    };

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let results = catalog
        .search(params.query.trim(), params.year, media_type, limit)
        .await?;
    let total = results.len();

    Ok(ApiResponse::ok(
        "Search completed",
        SearchResponse { results, total },
    ))
}

/// GET /api/catalog/movies/{id}
async fn get_movie(State(ctx): State<Ctx>, Path(id): Path<u64>) -> ApiResult<MovieDetails> {
    let catalog = require_catalog(&ctx)?;
    let movie = catalog.movie(id).await?;

    Ok(ApiResponse::ok("Movie retrieved", movie))
}

pub fn mount() -> Router<Ctx> {
    Router::new()
        .route("/catalog/search", get(search))
        .route("/catalog/movies/{id}", get(get_movie))
}
