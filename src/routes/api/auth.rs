use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;

use crate::{
    Ctx,
    error::{ApiError, AppError},
    services::{
        TokenExchangeError, TokenRequest,
        token_exchange::UpstreamReply,
    },
};

/// POST /api/auth/token
///
/// Replies with the token endpoint's own status and body rather than the
/// usual envelope.
async fn exchange_token(
    State(ctx): State<Ctx>,
    Json(request): Json<TokenRequest>,
) -> Result<Response, AppError> {
    let exchange = ctx
        .token_exchange
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("Token exchange not configured".to_string()))?;

    match exchange.exchange(&request).await {
        Ok(reply) => Ok(relay(reply)),
        Err(TokenExchangeError::Upstream(e)) => Ok((
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": format!("Token endpoint unreachable: {e}") })),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

fn relay(reply: UpstreamReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = reply
        .content_type
        .unwrap_or_else(|| "application/json".to_string());

    (status, [(header::CONTENT_TYPE, content_type)], reply.body).into_response()
}

pub fn mount() -> Router<Ctx> {
    Router::new().route("/auth/token", post(exchange_token))
}
