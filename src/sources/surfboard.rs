//! ARRIS SURFboard session client
//!
//! Each snapshot takes two sequential requests against
//! `/cmconnectionstatus.html`:
//!
//! 1. `GET ?login_<credential>` with `Authorization: Basic <credential>`.
//!    The body of a 200 response is a one-shot session token.
//! 2. `GET ?ct_<token>` with the same header. The body is the status page.
//!
//! Tokens are never reused; every snapshot logs in again. The device serves
//! a self-signed certificate, so certificate verification is disabled for
//! this client, and a private cookie jar carries any session cookie from the
//! login response to the status request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, trace};

use super::traits::StatusSource;
use crate::config::DeviceConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::ConnectionStatusSnapshot;
use crate::parser;
use crate::utils::UrlUtils;

pub const STATUS_PATH: &str = "/cmconnectionstatus.html";
pub const MIN_TOKEN_LEN: usize = 10;
pub const MAX_TOKEN_LEN: usize = 100;

const LOGIN_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Session token returned by the login request
///
/// Consumed by [`SurfboardClient::fetch_status`], so a token cannot be
/// used for more than one status fetch.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Validate a login response body
    pub fn parse(body: String) -> SourceResult<Self> {
        if body.len() < MIN_TOKEN_LEN || body.len() > MAX_TOKEN_LEN {
            return Err(SourceError::MalformedToken { length: body.len() });
        }
        Ok(Self(body))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken(****, len={})", self.0.len())
    }
}

/// HTTP session against one modem
pub struct SurfboardClient {
    base_url: String,
    credentials: String,
    authorization: HeaderValue,
    client: Client,
}

impl SurfboardClient {
    /// Build a client from device settings
    pub fn new(config: &DeviceConfig) -> SourceResult<Self> {
        Self::with_timeouts(
            &config.base_url,
            &config.credentials,
            config.connect_timeout,
            config.request_timeout,
        )
    }

    pub fn with_timeouts(
        base_url: &str,
        credentials: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> SourceResult<Self> {
        let base_url = UrlUtils::parse_base(base_url)
            .map_err(|e| SourceError::invalid_config("base_url", e.to_string()))?;

        let mut authorization = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|_| {
                SourceError::invalid_config(
                    "credentials",
                    "contains characters not allowed in an HTTP header",
                )
            })?;
        authorization.set_sensitive(true);

        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .cookie_store(true)
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| SourceError::invalid_config("http_client", e.to_string()))?;

        Ok(Self {
            base_url,
            credentials: credentials.to_string(),
            authorization,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn login_url(&self) -> String {
        format!("{}{}?login_{}", self.base_url, STATUS_PATH, self.credentials)
    }

    fn status_url(&self, token: &SessionToken) -> String {
        format!("{}{}?ct_{}", self.base_url, STATUS_PATH, token.as_str())
    }

    /// Perform the login request and return the one-shot session token
    pub async fn login(&self) -> SourceResult<SessionToken> {
        let url = self.login_url();
        debug!("Logging in to {}", UrlUtils::obfuscate_credentials(&url));

        let request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(CONTENT_TYPE, LOGIN_CONTENT_TYPE);
        let response = send("login", request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| transport_error("login", &e))?;

        let token = SessionToken::parse(body)?;
        trace!("Received session token ({} bytes)", token.as_str().len());
        Ok(token)
    }

    /// Fetch the status page with a fresh token and extract it
    pub async fn fetch_status(&self, token: SessionToken) -> SourceResult<ConnectionStatusSnapshot> {
        let url = self.status_url(&token);
        debug!("Fetching status page {}", UrlUtils::obfuscate_credentials(&url));

        let request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.authorization.clone());
        let response = send("status", request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error("status", &e))?;

        debug!("Fetched {} bytes of status page", body.len());
        parser::extract_bytes(&body)
    }
}

#[async_trait]
impl StatusSource for SurfboardClient {
    async fn fetch_snapshot(&self) -> SourceResult<ConnectionStatusSnapshot> {
        let token = self.login().await?;
        self.fetch_status(token).await
    }

    fn describe(&self) -> String {
        UrlUtils::obfuscate_credentials(&self.base_url)
    }
}

async fn send(stage: &str, request: reqwest::RequestBuilder) -> SourceResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(stage, &e))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(SourceError::http_status(stage, status.as_u16()));
    }
    Ok(response)
}

fn transport_error(stage: &str, error: &reqwest::Error) -> SourceError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else {
        UrlUtils::obfuscate_credentials(&error.to_string())
    };
    SourceError::transport(stage, message)
}
