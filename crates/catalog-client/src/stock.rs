use catalog_core::error::AppError;
use catalog_core::models::StockRecord;
use catalog_core::traits::StockSource;
use url::Url;

use crate::http::{JsonClient, endpoint};

/// Stock service client: `GET /item/{id}` per product.
#[derive(Clone)]
pub struct ReqwestStockClient {
    http: JsonClient,
    base_url: Url,
}

impl ReqwestStockClient {
    pub fn new(http: JsonClient, base_url: Url) -> Self {
        Self { http, base_url }
    }
}

impl StockSource for ReqwestStockClient {
    async fn stock(&self, product_id: &str) -> Result<StockRecord, AppError> {
        let url = endpoint(&self.base_url, &["item", product_id])?;
        self.http.get(&url).await
    }
}
