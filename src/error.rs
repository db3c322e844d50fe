use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    ApiResponse,
    catalog::CatalogError,
    entities::StoreError,
    services::{TokenExchangeError, TrackerError},
};

/// Client-facing failures raised directly by handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    TokenExchange(#[from] TokenExchangeError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ApiError(ApiError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::ApiError(ApiError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            Self::ApiError(ApiError::ServiceUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::DatabaseError(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Catalog(e) => catalog_status(e),
            Self::Store(e) => store_status(e),
            Self::Tracker(TrackerError::Catalog(e)) => catalog_status(e),
            Self::Tracker(TrackerError::Store(e)) => store_status(e),
            Self::Tracker(TrackerError::SeasonNotFound { .. }) => StatusCode::NOT_FOUND,
            Self::TokenExchange(TokenExchangeError::MissingGrant) => StatusCode::BAD_REQUEST,
            Self::TokenExchange(TokenExchangeError::Upstream(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

const fn catalog_status(error: &CatalogError) -> StatusCode {
    match error {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
        CatalogError::Network(_) | CatalogError::Api { .. } | CatalogError::Parse(_) => {
            StatusCode::BAD_GATEWAY
        }
        CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

const fn store_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::InvalidStatus(_) | StoreError::UnknownList(_) => StatusCode::BAD_REQUEST,
        StoreError::Database(_) | StoreError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        let body: ApiResponse<()> = ApiResponse {
            code: status.as_u16(),
            message: self.to_string(),
            data: None,
        };

        (status, Json(body)).into_response()
    }
}
