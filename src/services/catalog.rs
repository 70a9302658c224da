//! Product catalog: admin CRUD plus the demand-ranked storefront listing.

use crate::entities::product;
use crate::errors::ServiceError;
use crate::services::uploads::UploadStore;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    ModelTrait, QueryOrder, Set, Statement,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    pub price: Decimal,
    pub weight: f64,
}

impl ProductInput {
    fn check(&self) -> Result<(), ServiceError> {
        self.validate()?;
        if self.price <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Price must be positive".to_string(),
            ));
        }
        if self.weight <= 0.0 {
            return Err(ServiceError::ValidationError(
                "Weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Storefront listing row: a product with its all-time demand and rank.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProduct {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub weight: f64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub total_sold: i64,
    pub order_count: i64,
    pub rank: usize,
}

#[derive(Debug, FromQueryResult)]
struct RankedRow {
    id: i32,
    name: String,
    price: Decimal,
    weight: f64,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    total_sold: i64,
    order_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
    uploads: UploadStore,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>, uploads: UploadStore) -> Self {
        Self { db, uploads }
    }

    /// Admin listing, newest first.
    pub async fn list(&self) -> Result<Vec<product::Model>, ServiceError> {
        Ok(product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Storefront listing ordered by lifetime units sold, then by the number
    /// of distinct orders, then name. Counts include every order regardless
    /// of status, so rankings reflect raw demand.
    #[instrument(skip(self))]
    pub async fn list_ranked(&self) -> Result<Vec<RankedProduct>, ServiceError> {
        let backend = self.db.get_database_backend();
        let sql = r#"
            SELECT p.id, p.name, p.price, p.weight, p.image_url, p.created_at,
                   CAST(COALESCE(SUM(oi.quantity), 0) AS BIGINT) AS total_sold,
                   CAST(COUNT(DISTINCT oi.order_code) AS BIGINT) AS order_count
            FROM products p
            LEFT JOIN order_items oi ON p.id = oi.product_id
            GROUP BY p.id, p.name, p.price, p.weight, p.image_url, p.created_at
            ORDER BY total_sold DESC, order_count DESC, p.name ASC
        "#;
        let rows = RankedRow::find_by_statement(Statement::from_string(backend, sql))
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, r)| RankedProduct {
                id: r.id,
                name: r.name,
                price: r.price,
                weight: r.weight,
                image_url: r.image_url,
                created_at: r.created_at,
                total_sold: r.total_sold,
                order_count: r.order_count,
                rank: i + 1,
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    /// Creates a product. A stored image whose row never materializes is
    /// removed again, as with payment receipts.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: ProductInput,
        image_url: Option<String>,
    ) -> Result<product::Model, ServiceError> {
        let result = self.insert_product(input, image_url.clone()).await;
        if result.is_err() {
            if let Some(image) = image_url {
                warn!(image = %image, "Product row not created; removing stored image");
                self.uploads.remove_product_image(&image).await;
            }
        }
        result
    }

    async fn insert_product(
        &self,
        input: ProductInput,
        image_url: Option<String>,
    ) -> Result<product::Model, ServiceError> {
        input.check()?;
        let model = product::ActiveModel {
            name: Set(input.name),
            price: Set(input.price),
            weight: Set(input.weight),
            image_url: Set(image_url),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let created = model.insert(&*self.db).await?;
        info!(product_id = created.id, "Product created");
        Ok(created)
    }

    /// Updates a product. A new image replaces and deletes the old file;
    /// `remove_image` drops it without a replacement. A new image is removed
    /// again when the update fails.
    #[instrument(skip(self, input), fields(product_id = id))]
    pub async fn update(
        &self,
        id: i32,
        input: ProductInput,
        new_image: Option<String>,
        remove_image: bool,
    ) -> Result<product::Model, ServiceError> {
        let result = self
            .apply_update(id, input, new_image.clone(), remove_image)
            .await;
        if result.is_err() {
            if let Some(image) = new_image {
                warn!(image = %image, "Product row not updated; removing stored image");
                self.uploads.remove_product_image(&image).await;
            }
        }
        result
    }

    async fn apply_update(
        &self,
        id: i32,
        input: ProductInput,
        new_image: Option<String>,
        remove_image: bool,
    ) -> Result<product::Model, ServiceError> {
        input.check()?;
        let existing = self.get(id).await?;
        let old_image = existing.image_url.clone();

        let image_url = if let Some(image) = new_image {
            Some(image)
        } else if remove_image {
            None
        } else {
            old_image.clone()
        };

        let mut active: product::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.price = Set(input.price);
        active.weight = Set(input.weight);
        active.image_url = Set(image_url.clone());
        let updated = active.update(&*self.db).await?;

        if let Some(old) = old_image {
            if image_url.as_deref() != Some(old.as_str()) {
                self.uploads.remove_product_image(&old).await;
            }
        }

        info!(product_id = id, "Product updated");
        Ok(updated)
    }

    /// Deletes a product and its stored image. Past order items keep their
    /// denormalized snapshot.
    #[instrument(skip(self), fields(product_id = id))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        let image = existing.image_url.clone();
        existing.delete(&*self.db).await?;
        if let Some(image) = image {
            self.uploads.remove_product_image(&image).await;
        }
        info!(product_id = id, "Product deleted");
        Ok(())
    }
}
