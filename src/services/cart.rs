//! Session carts. Selections live in memory keyed by an opaque session id;
//! product details are resolved against the catalog at read time so price
//! edits are always reflected.

use crate::entities::product;
use crate::errors::ServiceError;
use dashmap::DashMap;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product_id: i32,
    pub name: String,
    pub price: Decimal,
    pub weight: f64,
    pub quantity: i32,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
    sessions: Arc<DashMap<String, HashMap<i32, i32>>>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Resolves quantities against the catalog. Unknown products and
    /// non-positive quantities are silently dropped.
    async fn resolve(&self, selections: &HashMap<i32, i32>) -> Result<CartView, ServiceError> {
        let wanted: Vec<i32> = selections
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(id, _)| *id)
            .collect();

        if wanted.is_empty() {
            return Ok(CartView {
                lines: vec![],
                subtotal: Decimal::ZERO,
            });
        }

        let products = product::Entity::find()
            .filter(product::Column::Id.is_in(wanted))
            .all(&*self.db)
            .await?;

        let mut lines: Vec<CartLine> = products
            .into_iter()
            .map(|p| {
                let quantity = *selections.get(&p.id).unwrap_or(&0);
                CartLine {
                    product_id: p.id,
                    name: p.name,
                    price: p.price,
                    weight: p.weight,
                    quantity,
                    line_total: p.price * Decimal::from(quantity),
                }
            })
            .collect();
        lines.sort_by_key(|l| l.product_id);

        let subtotal = lines.iter().map(|l| l.line_total).sum();
        Ok(CartView { lines, subtotal })
    }

    /// Replaces the session's cart with the given selections and returns the
    /// resolved view.
    #[instrument(skip(self, selections), fields(session = %session_id))]
    pub async fn replace(
        &self,
        session_id: &str,
        selections: HashMap<i32, i32>,
    ) -> Result<CartView, ServiceError> {
        let view = self.resolve(&selections).await?;
        if view.is_empty() {
            self.sessions.remove(session_id);
        } else {
            let kept: HashMap<i32, i32> = view
                .lines
                .iter()
                .map(|l| (l.product_id, l.quantity))
                .collect();
            self.sessions.insert(session_id.to_string(), kept);
        }
        Ok(view)
    }

    pub async fn view(&self, session_id: &str) -> Result<CartView, ServiceError> {
        let selections = self
            .sessions
            .get(session_id)
            .map(|s| s.clone())
            .unwrap_or_default();
        self.resolve(&selections).await
    }

    /// Empties the session's cart. Called once checkout commits.
    pub fn clear(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }
}
