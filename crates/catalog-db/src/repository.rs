use catalog_core::error::AppError;
use catalog_core::models::{NormalizedProduct, ProductSnapshot, ProductType, compute_hash};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

/// Repository for product snapshots in PostgreSQL.
///
/// Every save appends a row; nothing is updated in place.
#[derive(Clone)]
pub struct ProductRepository {
    pool: Pool<Postgres>,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Save one product. Returns the generated snapshot UUID.
    pub async fn save(&self, product: &NormalizedProduct) -> Result<Uuid, AppError> {
        let data = serde_json::to_value(product)?;
        let data_hash = compute_hash(&serde_json::to_string(product)?);

        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO product_snapshots
                (product_id, product_type, title, subtitle, kind, price, quantity, data, data_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&product.id)
        .bind(product.product_type.as_str())
        .bind(&product.title)
        .bind(&product.subtitle)
        .bind(&product.kind)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&data)
        .bind(&data_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        tracing::debug!(product_id = %product.id, snapshot_id = %row.0, "Saved product");
        Ok(row.0)
    }

    /// Get the most recent snapshot of a product.
    pub async fn get_latest(&self, product_id: &str) -> Result<Option<ProductSnapshot>, AppError> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT id, product_id, product_type, title, subtitle, kind, price, quantity, data_hash, created_at
            FROM product_snapshots
            WHERE product_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        row.map(ProductSnapshot::try_from).transpose()
    }

    /// Get snapshot history for a product, newest first.
    pub async fn get_history(
        &self,
        product_id: &str,
        limit: usize,
    ) -> Result<Vec<ProductSnapshot>, AppError> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT id, product_id, product_type, title, subtitle, kind, price, quantity, data_hash, created_at
            FROM product_snapshots
            WHERE product_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(product_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(ProductSnapshot::try_from).collect()
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct SnapshotRow {
    id: Uuid,
    product_id: String,
    product_type: String,
    title: String,
    subtitle: String,
    kind: Option<String>,
    price: Option<f64>,
    quantity: Option<i64>,
    data_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SnapshotRow> for ProductSnapshot {
    type Error = AppError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        let product_type: ProductType = row
            .product_type
            .parse()
            .map_err(|e| AppError::DatabaseError(format!("snapshot {}: {e}", row.id)))?;

        Ok(ProductSnapshot {
            id: row.id,
            product: NormalizedProduct {
                id: row.product_id,
                product_type,
                title: row.title,
                subtitle: row.subtitle,
                kind: row.kind,
                price: row.price,
                quantity: row.quantity,
            },
            data_hash: row.data_hash,
            created_at: row.created_at,
        })
    }
}

// -- Trait implementation --

impl catalog_core::traits::ProductStore for ProductRepository {
    async fn save(&self, product: &NormalizedProduct) -> Result<Uuid, AppError> {
        ProductRepository::save(self, product).await
    }
}
