use axum::{
    Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate;
use crate::{
    ApiResponse, ApiResult, Ctx,
    catalog::MediaType,
    entities::{ListEntry, ListKind},
    error::{ApiError, AppError},
};

#[derive(Debug, Deserialize, Validate)]
pub struct ListPath {
    #[validate(length(min = 1, max = 64))]
    pub user: String,
    pub list: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EntryPath {
    #[validate(length(min = 1, max = 64))]
    pub user: String,
    pub list: String,
    pub media_type: String,
    pub media_id: u64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MediaPath {
    #[validate(length(min = 1, max = 64))]
    pub user: String,
    pub media_type: String,
    pub media_id: u64,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub list: ListKind,
    pub entries: Vec<ListEntry>,
    pub total: usize,
}

fn parse_media_type(raw: &str) -> Result<MediaType, AppError> {
    MediaType::parse(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown media type: {raw}")).into())
}

/// GET /api/users/{user}/lists/{list}
async fn get_list(State(ctx): State<Ctx>, Path(path): Path<ListPath>) -> ApiResult<ListResponse> {
    validate(&path)?;
    let list: ListKind = path.list.parse()?;

    let entries = ListEntry::list(&ctx.db, &path.user, list).await?;
    let total = entries.len();

    Ok(ApiResponse::ok(
        "List retrieved",
        ListResponse {
            list,
            entries,
            total,
        },
    ))
}

/// PUT /api/users/{user}/lists/{list}/{media_type}/{media_id}
async fn add_entry(State(ctx): State<Ctx>, Path(path): Path<EntryPath>) -> ApiResult<ListEntry> {
    validate(&path)?;
    let list: ListKind = path.list.parse()?;
    let media_type = parse_media_type(&path.media_type)?;

    let entry = ListEntry::add(&ctx.db, &path.user, list, media_type, path.media_id).await?;

    Ok(ApiResponse::ok("Added to list", entry))
}

/// DELETE /api/users/{user}/lists/{list}/{media_type}/{media_id}
async fn remove_entry(State(ctx): State<Ctx>, Path(path): Path<EntryPath>) -> ApiResult<()> {
    validate(&path)?;
    let list: ListKind = path.list.parse()?;
    let media_type = parse_media_type(&path.media_type)?;

    if !ListEntry::remove(&ctx.db, &path.user, list, media_type, path.media_id).await? {
        return Err(ApiError::NotFound(format!(
            "{media_type} {} is not on {list}",
            path.media_id
        ))
        .into());
    }

    Ok(ApiResponse::ok("Removed from list", ()))
}

/// GET /api/users/{user}/memberships/{media_type}/{media_id}
async fn get_memberships(
    State(ctx): State<Ctx>,
    Path(path): Path<MediaPath>,
) -> ApiResult<Vec<ListKind>> {
    validate(&path)?;
    let media_type = parse_media_type(&path.media_type)?;

    let lists = ListEntry::lists_containing(&ctx.db, &path.user, media_type, path.media_id).await?;

    Ok(ApiResponse::ok("Memberships retrieved", lists))
}

pub fn mount() -> Router<Ctx> {
    Router::new()
        .route("/users/{user}/lists/{list}", get(get_list))
        .route(
            "/users/{user}/lists/{list}/{media_type}/{media_id}",
            put(add_entry).delete(remove_entry),
        )
        .route(
            "/users/{user}/memberships/{media_type}/{media_id}",
            get(get_memberships),
        )
}
