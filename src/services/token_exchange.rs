use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::OAuthConfig;

/// Body accepted by the token endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub code: Option<String>,
    pub refresh_token: Option<String>,
}

/// Grant forwarded upstream, chosen from the request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    AuthorizationCode(String),
    RefreshToken(String),
}

impl TokenRequest {
    /// An authorization code wins over a refresh token when both are sent
    pub fn grant(&self) -> Option<Grant> {
        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(String::from);
        present(&self.code)
            .map(Grant::AuthorizationCode)
            .or_else(|| present(&self.refresh_token).map(Grant::RefreshToken))
    }
}

/// Upstream answer, relayed verbatim
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Proxies OAuth token requests, adding the server-held client credentials
pub struct TokenExchange {
    client: reqwest::Client,
    config: OAuthConfig,
}

impl TokenExchange {
    pub fn new(config: OAuthConfig) -> Result<Self, TokenExchangeError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("CineMontauge/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(TokenExchangeError::Upstream)?;

        Ok(Self { client, config })
    }

    /// Form fields sent to the token URL
    pub fn form(&self, grant: &Grant) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("client_id", self.config.client_id.clone()),
            ("client_secret", self.config.client_secret.clone()),
            ("redirect_uri", self.config.redirect_uri.clone()),
        ];

        match grant {
            Grant::AuthorizationCode(code) => {
                form.push(("grant_type", "authorization_code".to_string()));
                form.push(("code", code.clone()));
            }
            Grant::RefreshToken(token) => {
                form.push(("grant_type", "refresh_token".to_string()));
                form.push(("refresh_token", token.clone()));
            }
        }

        form
    }

    /// Forward the request; any upstream status counts as a reply
    pub async fn exchange(&self, request: &TokenRequest) -> Result<UpstreamReply, TokenExchangeError> {
        let grant = request.grant().ok_or(TokenExchangeError::MissingGrant)?;
        debug!("Forwarding token request to {}", self.config.token_url);

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&self.form(&grant))
            .send()
            .await
            .map_err(|e| {
                error!("Token endpoint unreachable: {}", e);
                TokenExchangeError::Upstream(e)
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await?;

        debug!("Token endpoint answered {}", status);
        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}

/// Token exchange errors
#[derive(Debug, thiserror::Error)]
pub enum TokenExchangeError {
    #[error("Request must include either code or refreshToken")]
    MissingGrant,

    #[error("Token endpoint unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
}
