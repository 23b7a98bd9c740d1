use std::time::Duration;

use catalog_core::AppError;
use url::Url;

use crate::http::JsonClient;
use crate::metadata::ReqwestCatalogClient;
use crate::stock::ReqwestStockClient;

pub const DEFAULT_METADATA_HOST: &str = "http://store.metadata.api.co.uk";
pub const DEFAULT_STOCKS_HOST: &str = "http://stock.api.co.uk";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the upstream services live and how long to wait for them.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub metadata_host: Url,
    pub stocks_host: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Validate both hosts as absolute http(s) URLs.
    pub fn new(metadata_host: &str, stocks_host: &str) -> Result<Self, AppError> {
        Ok(Self {
            metadata_host: parse_host("metadata host", metadata_host)?,
            stocks_host: parse_host("stocks host", stocks_host)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build both clients over one shared connection pool.
    pub fn clients(&self) -> Result<(ReqwestCatalogClient, ReqwestStockClient), AppError> {
        let http = JsonClient::with_timeout(self.timeout)?;
        Ok((
            ReqwestCatalogClient::new(http.clone(), self.metadata_host.clone()),
            ReqwestStockClient::new(http, self.stocks_host.clone()),
        ))
    }
}

fn parse_host(name: &str, raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw)
        .map_err(|e| AppError::ConfigError(format!("Invalid {name} '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::ConfigError(format!(
                "Invalid {name} '{raw}': scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }
    if url.host_str().is_none() {
        return Err(AppError::ConfigError(format!(
            "Invalid {name} '{raw}': no host"
        )));
    }

    Ok(url)
}
