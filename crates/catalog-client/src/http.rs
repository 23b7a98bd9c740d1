use std::time::Duration;

use catalog_core::error::AppError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::DEFAULT_TIMEOUT;

const USER_AGENT: &str = concat!("catalog-sync/", env!("CARGO_PKG_VERSION"));

/// Shared JSON-over-HTTP transport for the upstream services.
///
/// Any status >= 400 becomes [`AppError::Upstream`]; nothing is retried.
#[derive(Clone)]
pub struct JsonClient {
    client: Client,
    timeout_secs: u64,
}

impl JsonClient {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }

    /// GET `url` and decode the body as JSON.
    pub async fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<T, AppError> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET `url` and return the raw body.
    pub async fn get_text(&self, url: &Url) -> Result<String, AppError> {
        tracing::debug!(%url, "GET");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            tracing::debug!(%url, status, "Upstream rejected request");
            return Err(AppError::Upstream {
                status,
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else {
                AppError::HttpError(format!("Failed to read response body: {e}"))
            }
        })
    }
}

/// Append path segments to `base`, percent-encoding each one.
///
/// Keeps any path prefix already on `base` (`http://host/api` + `books` →
/// `http://host/api/books`).
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::ConfigError(format!("'{base}' cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
