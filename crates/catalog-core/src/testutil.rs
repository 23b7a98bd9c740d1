//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! Mocks record the calls they receive behind `Arc<Mutex<_>>` so tests can
//! assert on them after the pipeline has run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Blacklist, NormalizedProduct, ProductType, RawCatalogItem, StockRecord};
use crate::titles::{StandardTitleResolver, TitleAttributes, Titles};
use crate::traits::{CatalogSource, ProductStore, StockSource, TitleResolver};

fn upstream(status: u16, path: &str) -> AppError {
    AppError::Upstream {
        status,
        url: format!("http://mock{path}"),
    }
}

// ---------------------------------------------------------------------------
// MockCatalog
// ---------------------------------------------------------------------------

/// Mock metadata service with per-endpoint failure injection.
#[derive(Clone, Default)]
pub struct MockCatalog {
    feeds: HashMap<ProductType, Vec<RawCatalogItem>>,
    blacklist: Vec<String>,
    feed_failures: HashMap<ProductType, u16>,
    blacklist_failure: Option<u16>,
    /// Paths requested, in call order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockCatalog {
    /// Every feed and the blacklist empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a feed with records decoded from `body`.
    pub fn with_feed(mut self, product_type: ProductType, body: serde_json::Value) -> Self {
        let items = RawCatalogItem::decode_feed(product_type, &body.to_string())
            .expect("fixture feed should decode");
        self.feeds.insert(product_type, items);
        self
    }

    pub fn with_blacklist(mut self, ids: &[&str]) -> Self {
        self.blacklist = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn failing_feed(mut self, product_type: ProductType, status: u16) -> Self {
        self.feed_failures.insert(product_type, status);
        self
    }

    pub fn failing_blacklist(mut self, status: u16) -> Self {
        self.blacklist_failure = Some(status);
        self
    }
}

impl CatalogSource for MockCatalog {
    async fn blacklist(&self) -> Result<Blacklist, AppError> {
        self.requests.lock().unwrap().push("/blacklist".into());
        match self.blacklist_failure {
            Some(status) => Err(upstream(status, "/blacklist")),
            None => Ok(self.blacklist.iter().cloned().collect()),
        }
    }

    async fn catalog(&self, product_type: ProductType) -> Result<Vec<RawCatalogItem>, AppError> {
        let path = format!("/{}", product_type.feed_path());
        self.requests.lock().unwrap().push(path.clone());
        match self.feed_failures.get(&product_type) {
            Some(&status) => Err(upstream(status, &path)),
            None => Ok(self.feeds.get(&product_type).cloned().unwrap_or_default()),
        }
    }
}

// ---------------------------------------------------------------------------
// MockStock
// ---------------------------------------------------------------------------

/// Mock stock service. Unknown ids answer 404.
#[derive(Clone, Default)]
pub struct MockStock {
    records: HashMap<String, StockRecord>,
    failures: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    /// Product ids requested, in call order.
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl MockStock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, id: &str, price: f64, quantity: i64) -> Self {
        self.records.insert(
            id.to_string(),
            StockRecord {
                id: Some(id.to_string()),
                price,
                quantity,
            },
        );
        self
    }

    pub fn failing(mut self, id: &str, status: u16) -> Self {
        self.failures.insert(id.to_string(), status);
        self
    }

    /// Hold the answer for `id` back by `delay`.
    pub fn with_delay(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }
}

impl StockSource for MockStock {
    async fn stock(&self, product_id: &str) -> Result<StockRecord, AppError> {
        self.requested.lock().unwrap().push(product_id.to_string());
        let path = format!("/item/{product_id}");
        if let Some(&delay) = self.delays.get(product_id) {
            tokio::time::sleep(delay).await;
        }
        if let Some(&status) = self.failures.get(product_id) {
            return Err(upstream(status, &path));
        }
        self.records
            .get(product_id)
            .cloned()
            .ok_or_else(|| upstream(404, &path))
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// Mock store that records saves.
#[derive(Clone)]
pub struct MockStore {
    pub saved: Arc<Mutex<Vec<NormalizedProduct>>>,
    save_error: Arc<Mutex<Option<AppError>>>,
}

impl MockStore {
    pub fn empty() -> Self {
        Self {
            saved: Arc::new(Mutex::new(Vec::new())),
            save_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Store whose first save fails with `error`.
    pub fn with_save_error(error: AppError) -> Self {
        Self {
            saved: Arc::new(Mutex::new(Vec::new())),
            save_error: Arc::new(Mutex::new(Some(error))),
        }
    }
}

impl ProductStore for MockStore {
    async fn save(&self, product: &NormalizedProduct) -> Result<Uuid, AppError> {
        let mut err = self.save_error.lock().unwrap();
        if let Some(e) = err.take() {
            return Err(e);
        }
        self.saved.lock().unwrap().push(product.clone());
        Ok(Uuid::new_v4())
    }
}

// ---------------------------------------------------------------------------
// RecordingResolver
// ---------------------------------------------------------------------------

/// Resolver that records a flat rendering of every attribute bag it sees,
/// then defers to [`StandardTitleResolver`].
#[derive(Clone, Default)]
pub struct RecordingResolver {
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl RecordingResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TitleResolver for RecordingResolver {
    fn resolve(&self, attributes: &TitleAttributes<'_>) -> Titles {
        let rendered = match attributes {
            TitleAttributes::Book {
                book_title,
                kind,
                author,
            } => format!(
                "book|bookTitle={book_title}|kind={}|author={author}",
                kind.unwrap_or("-")
            ),
            TitleAttributes::Film {
                product_type,
                title,
                kind,
                director,
                year,
            } => format!(
                "{product_type}|title={title}|kind={}|director={director}|year={}",
                kind.unwrap_or("-"),
                year.map_or_else(|| "-".to_string(), |y| y.to_string())
            ),
            TitleAttributes::VinylRecord {
                album_name,
                artist_name,
            } => format!("vinyl-record|albumName={album_name}|artistName={artist_name}"),
        };
        self.seen.lock().unwrap().push(rendered);
        StandardTitleResolver.resolve(attributes)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Catalog with one book, one dvd, three blu-rays and two vinyls; vinyl 127
/// is blacklisted.
pub fn fixture_catalog() -> MockCatalog {
    MockCatalog::new()
        .with_feed(
            ProductType::Book,
            serde_json::json!([{
                "id": "123",
                "title": "raw title",
                "genre": "fiction",
                "author": "someone",
                "isbn10": "1234567898",
                "isbn13": "123-1234567898",
                "releaseDate": "10-02-2007"
            }]),
        )
        .with_feed(
            ProductType::Dvd,
            serde_json::json!([{
                "id": "124",
                "title": "dvd title",
                "genre": "film",
                "director": "some director",
                "credits": [],
                "releaseDate": "10-02-2007"
            }]),
        )
        .with_feed(
            ProductType::BluRay,
            serde_json::json!([
                {
                    "id": "125",
                    "title": "blue-ray title",
                    "genre": "film",
                    "director": "some director",
                    "credits": [],
                    "releaseDate": "10-02-2007"
                },
                {
                    "id": "130",
                    "title": "blue-ray title 2",
                    "genre": "film",
                    "director": "some director",
                    "credits": [],
                    "releaseDate": "10-02-2007"
                },
                {
                    "id": "140",
                    "title": "blue-ray title 3",
                    "genre": "film",
                    "director": "some director",
                    "credits": [],
                    "releaseDate": "10-02-2007"
                }
            ]),
        )
        .with_feed(
            ProductType::VinylRecord,
            serde_json::json!([
                {"id": "126", "albumName": "Master of puppets", "artistName": "metallica"},
                {"id": "127", "albumName": "Raining blood", "artistName": "Slayer"}
            ]),
        )
        .with_blacklist(&["127"])
}

/// Stock for every product in [`fixture_catalog`], blacklisted ones included.
pub fn fixture_stock() -> MockStock {
    MockStock::new()
        .with_record("123", 12.0, 1)
        .with_record("124", 10.0, 3)
        .with_record("125", 1.0, 100)
        .with_record("126", 10.0, 1)
        .with_record("127", 10.0, 1)
        .with_record("130", 10.0, 1)
        .with_record("140", 10.0, 1)
}
