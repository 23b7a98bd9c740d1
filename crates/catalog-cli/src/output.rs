use std::io::Write;
use std::sync::{Arc, Mutex};

use catalog_core::error::AppError;
use catalog_core::models::NormalizedProduct;
use catalog_core::traits::ProductStore;
use uuid::Uuid;

/// ProductStore that writes each product as one JSON line instead of persisting it.
///
/// Returns the nil UUID for every save, since nothing is stored.
pub struct JsonLinesStore<W> {
    out: Arc<Mutex<W>>,
}

impl<W> Clone for JsonLinesStore<W> {
    fn clone(&self) -> Self {
        Self {
            out: Arc::clone(&self.out),
        }
    }
}

impl<W: Write + Send> JsonLinesStore<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }
}

impl<W: Write + Send> ProductStore for JsonLinesStore<W> {
    async fn save(&self, product: &NormalizedProduct) -> Result<Uuid, AppError> {
        let line = serde_json::to_string(product)?;
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out, "{line}")
            .map_err(|e| AppError::DatabaseError(format!("Failed to write product: {e}")))?;
        Ok(Uuid::nil())
    }
}
