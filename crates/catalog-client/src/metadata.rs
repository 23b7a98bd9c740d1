use catalog_core::error::AppError;
use catalog_core::models::{Blacklist, ProductType, RawCatalogItem};
use catalog_core::traits::CatalogSource;
use url::Url;

use crate::http::{JsonClient, endpoint};

/// Metadata service client: one feed per product type plus the blacklist.
#[derive(Clone)]
pub struct ReqwestCatalogClient {
    http: JsonClient,
    base_url: Url,
}

impl ReqwestCatalogClient {
    pub fn new(http: JsonClient, base_url: Url) -> Self {
        Self { http, base_url }
    }
}

impl CatalogSource for ReqwestCatalogClient {
    async fn blacklist(&self) -> Result<Blacklist, AppError> {
        let url = endpoint(&self.base_url, &["blacklist"])?;
        self.http.get(&url).await
    }

    async fn catalog(&self, product_type: ProductType) -> Result<Vec<RawCatalogItem>, AppError> {
        let url = endpoint(&self.base_url, &[product_type.feed_path()])?;
        let body = self.http.get_text(&url).await?;
        RawCatalogItem::decode_feed(product_type, &body)
    }
}
