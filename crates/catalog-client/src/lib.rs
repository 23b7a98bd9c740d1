pub mod config;
pub mod http;
pub mod metadata;
pub mod stock;


pub use config::ClientConfig;
pub use http::JsonClient;
pub use metadata::ReqwestCatalogClient;
pub use stock::ReqwestStockClient;
