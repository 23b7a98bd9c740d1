use futures::future::try_join_all;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Blacklist, NormalizedProduct, ProductType, RawCatalogItem, StockRecord};
use crate::normalize::normalize_all;
use crate::traits::{CatalogSource, ProductStore, StockSource, TitleResolver};

/// Orchestrates one catalog sync: fetch feeds → normalize → filter → price → save.
///
/// Generic over all external dependencies via traits, so tests can run the whole
/// pipeline without HTTP or a database. Every fan-out is fail-fast: the first
/// error aborts the run and is returned unchanged.
pub struct SyncService<C, S, R, P>
where
    C: CatalogSource,
    S: StockSource,
    R: TitleResolver,
    P: ProductStore,
{
    catalog: C,
    stock: S,
    resolver: R,
    store: P,
}

impl<C, S, R, P> SyncService<C, S, R, P>
where
    C: CatalogSource,
    S: StockSource,
    R: TitleResolver,
    P: ProductStore,
{
    pub fn new(catalog: C, stock: S, resolver: R, store: P) -> Self {
        Self {
            catalog,
            stock,
            resolver,
            store,
        }
    }

    /// Run the full pipeline once. Returns one snapshot id per saved product.
    ///
    /// 1. Fetch the blacklist and every catalog feed concurrently
    /// 2. Normalize all records (book, dvd, blu-ray, vinyl-record order)
    /// 3. Drop blacklisted products
    /// 4. Fetch stock for each remaining product concurrently
    /// 5. Merge stock into products by position
    /// 6. Save every product concurrently
    pub async fn fetch(&self) -> Result<Vec<Uuid>, AppError> {
        // 1. Fetch
        let (blacklist, feeds) = tokio::try_join!(self.catalog.blacklist(), self.fetch_feeds())?;
        tracing::info!(blacklisted = blacklist.len(), "Fetched blacklist");

        // 2. Normalize
        let products = normalize_all(&self.resolver, feeds.iter().flatten())?;
        let total = products.len();

        // 3. Filter
        let products = filter_by_blacklist(products, &blacklist);
        tracing::info!(
            total,
            dropped = total - products.len(),
            "Normalized products"
        );

        // 4. Stock
        let stocks = try_join_all(products.iter().map(|p| self.stock.stock(&p.id))).await?;
        tracing::info!(count = stocks.len(), "Fetched stock");

        // 5. Merge
        let products = merge(products, stocks);

        // 6. Persist
        let ids = try_join_all(products.iter().map(|p| self.store.save(p))).await?;
        tracing::info!(saved = ids.len(), "Sync complete");

        Ok(ids)
    }

    /// One feed per product type, in [`ProductType::ALL`] order.
    async fn fetch_feeds(&self) -> Result<Vec<Vec<RawCatalogItem>>, AppError> {
        try_join_all(ProductType::ALL.into_iter().map(|product_type| async move {
            let items = self.catalog.catalog(product_type).await?;
            tracing::info!(%product_type, count = items.len(), "Fetched catalog feed");
            Ok::<_, AppError>(items)
        }))
        .await
    }
}

/// Remove blacklisted products, keeping the rest in their original order.
pub fn filter_by_blacklist(
    products: Vec<NormalizedProduct>,
    blacklist: &Blacklist,
) -> Vec<NormalizedProduct> {
    products
        .into_iter()
        .filter(|product| !blacklist.contains(&product.id))
        .collect()
}

/// Attach price and quantity to each product. `stocks[i]` belongs to `products[i]`.
pub fn merge(products: Vec<NormalizedProduct>, stocks: Vec<StockRecord>) -> Vec<NormalizedProduct> {
    products
        .into_iter()
        .zip(stocks)
        .map(|(product, stock)| {
            if let Some(stock_id) = stock.id.as_deref().filter(|id| *id != product.id) {
                tracing::warn!(
                    product_id = %product.id,
                    %stock_id,
                    "Stock record id does not match product"
                );
            }
            product.with_stock(&stock)
        })
        .collect()
}
