use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AppError;

/// The closed set of product families served by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    Book,
    Dvd,
    BluRay,
    VinylRecord,
}

impl ProductType {
    /// Every product type, in pipeline order.
    pub const ALL: [ProductType; 4] = [
        ProductType::Book,
        ProductType::Dvd,
        ProductType::BluRay,
        ProductType::VinylRecord,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Book => "book",
            ProductType::Dvd => "dvd",
            ProductType::BluRay => "blu-ray",
            ProductType::VinylRecord => "vinyl-record",
        }
    }

    /// Path segment of this type's feed on the metadata service.
    pub fn feed_path(self) -> &'static str {
        match self {
            ProductType::Book => "books",
            ProductType::Dvd => "dvds",
            ProductType::BluRay => "bluerays",
            ProductType::VinylRecord => "vinyls",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::MalformedRecord(format!("unknown product type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Upstream ids show up both as JSON strings and as bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlexibleId {
    Text(String),
    Number(serde_json::Number),
}

impl From<FlexibleId> for String {
    fn from(id: FlexibleId) -> Self {
        match id {
            FlexibleId::Text(s) => s,
            FlexibleId::Number(n) => n.to_string(),
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    FlexibleId::deserialize(deserializer).map(Into::into)
}

fn deserialize_optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<FlexibleId>::deserialize(deserializer).map(|id| id.map(Into::into))
}

/// Product ids excluded from a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    ids: HashSet<String>,
}

impl Blacklist {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Blacklist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Blacklist {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<FlexibleId>::deserialize(deserializer)?;
        Ok(ids.into_iter().map(String::from).collect())
    }
}

// ---------------------------------------------------------------------------
// Raw catalog records
// ---------------------------------------------------------------------------

/// A book as served by `/books`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBook {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    pub author: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// A DVD or blu-ray as served by `/dvds` and `/bluerays`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilm {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    pub director: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// A vinyl record as served by `/vinyls`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVinyl {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub album_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub genre: Option<String>,
}

/// One record from a catalog feed, tagged with the feed it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCatalogItem {
    Book(RawBook),
    Dvd(RawFilm),
    BluRay(RawFilm),
    VinylRecord(RawVinyl),
}

impl RawCatalogItem {
    /// Decode a feed body (a JSON array) using the record shape of `product_type`.
    ///
    /// Records missing required fields fail the whole feed.
    pub fn decode_feed(product_type: ProductType, body: &str) -> Result<Vec<Self>, AppError> {
        let items = match product_type {
            ProductType::Book => serde_json::from_str::<Vec<RawBook>>(body)?
                .into_iter()
                .map(RawCatalogItem::Book)
                .collect(),
            ProductType::Dvd => serde_json::from_str::<Vec<RawFilm>>(body)?
                .into_iter()
                .map(RawCatalogItem::Dvd)
                .collect(),
            ProductType::BluRay => serde_json::from_str::<Vec<RawFilm>>(body)?
                .into_iter()
                .map(RawCatalogItem::BluRay)
                .collect(),
            ProductType::VinylRecord => serde_json::from_str::<Vec<RawVinyl>>(body)?
                .into_iter()
                .map(RawCatalogItem::VinylRecord)
                .collect(),
        };
        Ok(items)
    }

    pub fn product_type(&self) -> ProductType {
        match self {
            RawCatalogItem::Book(_) => ProductType::Book,
            RawCatalogItem::Dvd(_) => ProductType::Dvd,
            RawCatalogItem::BluRay(_) => ProductType::BluRay,
            RawCatalogItem::VinylRecord(_) => ProductType::VinylRecord,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RawCatalogItem::Book(b) => &b.id,
            RawCatalogItem::Dvd(f) | RawCatalogItem::BluRay(f) => &f.id,
            RawCatalogItem::VinylRecord(v) => &v.id,
        }
    }

    /// The record's genre, if it carries a non-empty one.
    pub fn genre(&self) -> Option<&str> {
        let genre = match self {
            RawCatalogItem::Book(b) => b.genre.as_deref(),
            RawCatalogItem::Dvd(f) | RawCatalogItem::BluRay(f) => f.genre.as_deref(),
            RawCatalogItem::VinylRecord(v) => v.genre.as_deref(),
        };
        genre.filter(|g| !g.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// Per-product price and quantity from the stock service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

/// The canonical product record handed to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub id: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

impl NormalizedProduct {
    /// Copy price and quantity from `stock`, leaving every other field alone.
    pub fn with_stock(mut self, stock: &StockRecord) -> Self {
        self.price = Some(stock.price);
        self.quantity = Some(stock.quantity);
        self
    }
}

/// A product as stored by one sync run.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSnapshot {
    pub id: Uuid,
    pub product: NormalizedProduct,
    /// SHA-256 of the product's JSON form (for change detection)
    pub data_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Compute a SHA-256 hash of a string, returned as 64-char hex.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
