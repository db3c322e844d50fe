pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod logging;
pub mod routes;
pub mod services;
pub mod tracker;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    catalog::Catalog,
    config::AppConfig,
    error::AppError,
    services::{TokenExchange, TrackerService},
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct Ctx {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    /// `None` without a catalog API key
    pub catalog: Option<Arc<Catalog>>,
    pub tracker: Option<Arc<TrackerService>>,
    /// `None` until OAuth credentials are configured
    pub token_exchange: Option<Arc<TokenExchange>>,
}

impl Ctx {
    /// Build the context with the catalog described by the configuration
    pub fn new(db: SqlitePool, config: AppConfig) -> Result<Self, AppError> {
        let catalog = catalog::create_catalog(&config.catalog)?;
        Self::with_catalog(db, config, catalog)
    }

    pub fn with_catalog(
        db: SqlitePool,
        config: AppConfig,
        catalog: Option<Catalog>,
    ) -> Result<Self, AppError> {
        let catalog = catalog.map(Arc::new);
        let tracker = catalog.clone().map(|catalog| {
            Arc::new(TrackerService::new(
                catalog,
                db.clone(),
                config.tracker.clone(),
            ))
        });
        let token_exchange = if config.oauth.is_configured() {
            Some(Arc::new(TokenExchange::new(config.oauth.clone())?))
        } else {
            None
        };

        Ok(Self {
            db,
            config: Arc::new(config),
            catalog,
            tracker,
            token_exchange,
        })
    }
}

/// Envelope for every JSON API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Application router with all API routes under `/api`
pub fn create_router(ctx: Ctx) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api::mount())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ctx)
}
