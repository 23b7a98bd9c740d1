pub mod error;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod release_date;
pub mod titles;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use error::AppError;
pub use models::{
    Blacklist, NormalizedProduct, ProductSnapshot, ProductType, RawCatalogItem, StockRecord,
    compute_hash,
};
pub use pipeline::SyncService;
pub use titles::{StandardTitleResolver, TitleAttributes, Titles};
pub use traits::{CatalogSource, NullStore, ProductStore, StockSource, TitleResolver};
