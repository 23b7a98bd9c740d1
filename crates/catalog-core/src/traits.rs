use std::future::Future;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Blacklist, NormalizedProduct, ProductType, RawCatalogItem, StockRecord};
use crate::titles::{TitleAttributes, Titles};

/// Reads catalog feeds and the blacklist from the metadata service.
pub trait CatalogSource: Send + Sync + Clone {
    /// Ids that must never be priced or persisted.
    fn blacklist(&self) -> impl Future<Output = Result<Blacklist, AppError>> + Send;

    /// Every record of one product type, in feed order.
    fn catalog(
        &self,
        product_type: ProductType,
    ) -> impl Future<Output = Result<Vec<RawCatalogItem>, AppError>> + Send;
}

/// Reads per-product price and quantity from the stock service.
pub trait StockSource: Send + Sync + Clone {
    fn stock(&self, product_id: &str) -> impl Future<Output = Result<StockRecord, AppError>> + Send;
}

/// Turns a product's attributes into its display title and subtitle.
pub trait TitleResolver: Send + Sync + Clone {
    fn resolve(&self, attributes: &TitleAttributes<'_>) -> Titles;
}

/// Persists finished product records.
pub trait ProductStore: Send + Sync + Clone {
    /// Save one product. Returns the id of the stored snapshot.
    fn save(
        &self,
        product: &NormalizedProduct,
    ) -> impl Future<Output = Result<Uuid, AppError>> + Send;
}

/// A no-op ProductStore for use when persistence is not needed.
#[derive(Debug, Clone)]
pub struct NullStore;

impl ProductStore for NullStore {
    async fn save(&self, _product: &NormalizedProduct) -> Result<Uuid, AppError> {
        Ok(Uuid::nil())
    }
}
