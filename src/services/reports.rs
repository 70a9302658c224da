//! Reservation report: what to pack, aggregated per product across every
//! order with a verified payment.

use crate::entities::order::{self, PaymentStatus};
use crate::entities::{order_item, product};
use crate::errors::ServiceError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// An order contributing units of one product.
#[derive(Debug, Clone, Serialize)]
pub struct ContributingOrder {
    pub order_code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Per-product rollup across all verified orders. Weight and cost use the
/// product's current catalog values.
#[derive(Debug, Clone, Serialize)]
pub struct ProductReservation {
    pub product_id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub unit_price: Decimal,
    pub unit_weight: f64,
    pub total_quantity: i64,
    pub total_weight: f64,
    pub total_cost: Decimal,
    pub orders: Vec<ContributingOrder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOrderLine {
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOrder {
    pub order_code: String,
    pub customer_name: String,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
    pub item_count: usize,
    pub total_price: Decimal,
    pub total_weight: f64,
    pub items: Vec<ReportOrderLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationReport {
    pub total_orders: usize,
    pub total_items: i64,
    pub total_weight: f64,
    pub total_cost: Decimal,
    pub generated_at: DateTime<Utc>,
    pub products: Vec<ProductReservation>,
    pub orders: Vec<ReportOrder>,
}

#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn reservation_report(&self) -> Result<ReservationReport, ServiceError> {
        let verified_orders = order::Entity::find()
            .filter(order::Column::PaymentStatus.eq(PaymentStatus::Verified.to_string()))
            .order_by_desc(order::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        if verified_orders.is_empty() {
            return Ok(ReservationReport {
                total_orders: 0,
                total_items: 0,
                total_weight: 0.0,
                total_cost: Decimal::ZERO,
                generated_at: Utc::now(),
                products: vec![],
                orders: vec![],
            });
        }

        let codes: Vec<String> = verified_orders.iter().map(|o| o.code.clone()).collect();
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderCode.is_in(codes))
            .all(&*self.db)
            .await?;

        let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
        let catalog: HashMap<i32, product::Model> = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut items_by_code: HashMap<&str, Vec<&order_item::Model>> = HashMap::new();
        for item in &items {
            items_by_code
                .entry(item.order_code.as_str())
                .or_default()
                .push(item);
        }

        // Per-product rollup. Items whose product has been deleted from the
        // catalog are left out, matching the join against products.
        let mut rollup: HashMap<i32, ProductReservation> = HashMap::new();
        for ord in &verified_orders {
            let Some(order_items) = items_by_code.get(ord.code.as_str()) else {
                continue;
            };
            for item in order_items {
                let Some(product) = catalog.get(&item.product_id) else {
                    continue;
                };
                let entry = rollup.entry(product.id).or_insert_with(|| ProductReservation {
                    product_id: product.id,
                    name: product.name.clone(),
                    image_url: product.image_url.clone(),
                    unit_price: product.price,
                    unit_weight: product.weight,
                    total_quantity: 0,
                    total_weight: 0.0,
                    total_cost: Decimal::ZERO,
                    orders: vec![],
                });
                entry.total_quantity += i64::from(item.quantity);
                entry.total_weight += product.weight * f64::from(item.quantity);
                entry.total_cost += product.price * Decimal::from(item.quantity);

                match entry.orders.iter_mut().find(|o| o.order_code == ord.code) {
                    Some(existing) => existing.quantity += item.quantity,
                    None => entry.orders.push(ContributingOrder {
                        order_code: ord.code.clone(),
                        customer_name: ord.customer_name.clone(),
                        contact_number: ord.contact_number.clone(),
                        quantity: item.quantity,
                        created_at: ord.created_at,
                    }),
                }
            }
        }

        let mut products: Vec<ProductReservation> = rollup.into_values().collect();
        products.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity).then(a.name.cmp(&b.name)));

        let total_items: i64 = products.iter().map(|p| p.total_quantity).sum();
        let total_weight: f64 = products.iter().map(|p| p.total_weight).sum();
        let total_cost: Decimal = products.iter().map(|p| p.total_cost).sum();

        let orders = verified_orders
            .iter()
            .map(|ord| {
                let order_items = items_by_code.get(ord.code.as_str());
                let lines: Vec<ReportOrderLine> = order_items
                    .map(|list| {
                        list.iter()
                            .filter_map(|item| {
                                let product = catalog.get(&item.product_id)?;
                                Some(ReportOrderLine {
                                    product_name: item.product_name.clone(),
                                    quantity: item.quantity,
                                    price: item.price,
                                    weight: product.weight,
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                let total_weight = lines
                    .iter()
                    .map(|l| l.weight * f64::from(l.quantity))
                    .sum();
                ReportOrder {
                    order_code: ord.code.clone(),
                    customer_name: ord.customer_name.clone(),
                    contact_number: ord.contact_number.clone(),
                    created_at: ord.created_at,
                    item_count: lines.len(),
                    total_price: ord.total_price,
                    total_weight,
                    items: lines,
                }
            })
            .collect();

        Ok(ReservationReport {
            total_orders: verified_orders.len(),
            total_items,
            total_weight,
            total_cost,
            generated_at: Utc::now(),
            products,
            orders,
        })
    }
}
