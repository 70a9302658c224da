//! The order ledger: reservation checkout, receipt submission, payment
//! verification, and the fulfilment state machine.

use crate::entities::order::{self, OrderStatus, PaymentStatus};
use crate::entities::order_item;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::notifications::{
    whatsapp_link, NoticeLine, OrderActionNotice, OrderItemsEditedNotice, OrderShippedNotice,
    OrderUpdatedNotice, PaymentLinkNotice, PaymentRejectedNotice, PaymentSubmittedNotice,
    PaymentVerifiedNotice, ReservationNotice,
};
use crate::services::cart::CartView;
use crate::services::settings::{render_template, SettingsService};
use crate::services::uploads::UploadStore;
use crate::shipping::Region;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::{Validate, ValidationError};

static CONTACT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10,11}$").unwrap());

fn validate_contact_number(value: &str) -> Result<(), ValidationError> {
    if CONTACT_RE.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("contact_number");
        err.message = Some("Please enter a valid contact number (10-11 digits)".into());
        Err(err)
    }
}

const CODE_ATTEMPTS: usize = 100;

/// Payment methods offered on the payment page.
pub const PAYMENT_METHODS: &[&str] = &["Bank Transfer", "Touch 'n Go (TnG)"];

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(custom = "validate_contact_number")]
    pub contact_number: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Postcode is required"))]
    pub postcode: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(custom = "validate_contact_number")]
    pub contact_number: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Postcode is required"))]
    pub postcode: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    pub status: String,
    pub payment_status: String,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSelection {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: order::Model,
    pub item_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentLinkResult {
    pub payment_link: String,
    pub whatsapp_link: String,
    pub whatsapp_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShippingResult {
    #[serde(flatten)]
    pub order: order::Model,
    pub customer_message: String,
    pub whatsapp_link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub product_count: u64,
    pub order_count: u64,
    pub pending_payments: u64,
    pub total_revenue: Decimal,
    pub recent_orders: Vec<order::Model>,
    pub orders_to_verify: Vec<order::Model>,
}

#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    events: EventSender,
    uploads: UploadStore,
    settings: SettingsService,
    code_prefix: String,
    public_base_url: String,
}

impl OrderService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        events: EventSender,
        uploads: UploadStore,
        settings: SettingsService,
        code_prefix: String,
        public_base_url: String,
    ) -> Self {
        Self {
            db,
            events,
            uploads,
            settings,
            code_prefix,
            public_base_url,
        }
    }

    pub fn payment_link(&self, code: &str) -> String {
        format!("{}payment/{}", self.public_base_url, code)
    }

    /// Draws prefix + four random digits until the code is free.
    async fn generate_code<C: ConnectionTrait>(&self, conn: &C) -> Result<String, ServiceError> {
        for _ in 0..CODE_ATTEMPTS {
            let number: u32 = rand::thread_rng().gen_range(1000..=9999);
            let code = format!("{}{}", self.code_prefix, number);
            let taken = order::Entity::find()
                .filter(order::Column::Code.eq(&code))
                .count(conn)
                .await?;
            if taken == 0 {
                return Ok(code);
            }
        }
        Err(ServiceError::Conflict(
            "Could not allocate a unique order code".to_string(),
        ))
    }

    async fn find_order(&self, code: &str) -> Result<order::Model, ServiceError> {
        order::Entity::find()
            .filter(order::Column::Code.eq(code))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", code)))
    }

    async fn find_items(&self, code: &str) -> Result<Vec<order_item::Model>, ServiceError> {
        Ok(order_item::Entity::find()
            .filter(order_item::Column::OrderCode.eq(code))
            .all(&*self.db)
            .await?)
    }

    /// Reserves the cart: creates the order in (reserved, pending) with its
    /// item snapshot, in one transaction.
    #[instrument(skip(self, cart, request), fields(customer = %request.customer_name))]
    pub async fn reserve(
        &self,
        cart: CartView,
        request: CheckoutRequest,
    ) -> Result<OrderDetails, ServiceError> {
        request.validate()?;
        if cart.is_empty() {
            return Err(ServiceError::ValidationError("Cart is empty".to_string()));
        }

        let region = Region::for_state(&request.state);
        let fee = region.shipping_fee();
        let total = cart.subtotal + fee;
        let now = chrono::Utc::now();

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start reservation transaction");
            ServiceError::DatabaseError(e)
        })?;

        let code = self.generate_code(&txn).await?;

        let order_model = order::ActiveModel {
            code: Set(code.clone()),
            customer_name: Set(request.customer_name.clone()),
            contact_number: Set(request.contact_number.clone()),
            address: Set(request.address.clone()),
            postcode: Set(request.postcode.clone()),
            state: Set(request.state.clone()),
            region: Set(region.to_string()),
            shipping_fee: Set(fee),
            total_price: Set(total),
            status: Set(OrderStatus::Reserved.to_string()),
            payment_method: Set(None),
            payment_status: Set(PaymentStatus::Pending.to_string()),
            payment_receipt: Set(None),
            payment_verified: Set(false),
            payment_verified_at: Set(None),
            payment_verified_by: Set(None),
            tracking_number: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(cart.lines.len());
        for line in &cart.lines {
            let item = order_item::ActiveModel {
                order_code: Set(code.clone()),
                product_id: Set(line.product_id),
                product_name: Set(line.name.clone()),
                quantity: Set(line.quantity),
                price: Set(line.price),
                weight: Set(line.weight),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, code = %code, "Failed to commit reservation");
            ServiceError::DatabaseError(e)
        })?;

        info!(code = %code, total = %total, "Order reserved");

        self.events.send_or_log(Event::OrderReserved(ReservationNotice {
            code: code.clone(),
            customer_name: request.customer_name,
            contact_number: request.contact_number,
            postcode: request.postcode,
            state: request.state,
            lines: items
                .iter()
                .map(|i| NoticeLine {
                    product_name: i.product_name.clone(),
                    quantity: i.quantity,
                    line_total: i.line_total(),
                })
                .collect(),
            subtotal: cart.subtotal,
            shipping_fee: fee,
            total_price: total,
            payment_link: self.payment_link(&code),
            at: now,
        }));

        Ok(OrderDetails {
            order: order_model,
            items,
        })
    }

    pub async fn get(&self, code: &str) -> Result<OrderDetails, ServiceError> {
        let order = self.find_order(code).await?;
        let items = self.find_items(code).await?;
        Ok(OrderDetails { order, items })
    }

    /// All orders, newest first, with their item counts.
    pub async fn list(&self) -> Result<Vec<OrderSummary>, ServiceError> {
        let rows = order::Entity::find()
            .find_with_related(order_item::Entity)
            .order_by_desc(order::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(order, items)| OrderSummary {
                order,
                item_count: items.len(),
            })
            .collect())
    }

    /// Payment-page data. Closed unless the order is still sitting untouched
    /// in (reserved, pending).
    pub async fn payment_page(&self, code: &str) -> Result<OrderDetails, ServiceError> {
        let details = self.get(code).await?;
        if !details.order.payment_open() {
            return Err(ServiceError::InvalidOperation(
                "This order is no longer available for payment.".to_string(),
            ));
        }
        Ok(details)
    }

    /// Stores the receipt and moves payment to pending_verification. The
    /// stored file is removed again if the database update fails.
    #[instrument(skip(self, receipt_bytes), fields(code = %code, method = %payment_method))]
    pub async fn submit_payment(
        &self,
        code: &str,
        payment_method: &str,
        receipt_filename: &str,
        receipt_bytes: &[u8],
    ) -> Result<order::Model, ServiceError> {
        let order = self.find_order(code).await?;
        if !order.payment_open() {
            return Err(ServiceError::InvalidOperation(
                "This order is no longer available for payment.".to_string(),
            ));
        }
        if payment_method.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Please select a payment method".to_string(),
            ));
        }

        let stored = self
            .uploads
            .store_receipt(code, receipt_filename, receipt_bytes)
            .await?;

        let mut active: order::ActiveModel = order.clone().into();
        active.payment_method = Set(Some(payment_method.to_string()));
        active.payment_status = Set(PaymentStatus::PendingVerification.to_string());
        active.payment_receipt = Set(Some(stored.clone()));
        active.updated_at = Set(chrono::Utc::now());

        let updated = match active.update(&*self.db).await {
            Ok(updated) => updated,
            Err(e) => {
                error!(error = %e, code = %code, "Receipt recorded on disk but not in database");
                self.uploads.remove_receipt(&stored).await;
                return Err(ServiceError::DatabaseError(e));
            }
        };

        info!(code = %code, receipt = %stored, "Payment submitted");

        self.events
            .send_or_log(Event::PaymentSubmitted(PaymentSubmittedNotice {
                code: code.to_string(),
                customer_name: updated.customer_name.clone(),
                contact_number: updated.contact_number.clone(),
                total_price: updated.total_price,
                payment_method: payment_method.to_string(),
                receipt_filename: stored,
                at: updated.updated_at,
            }));

        Ok(updated)
    }

    /// Marks the payment verified and confirms the order. Only a payment
    /// awaiting verification can be verified.
    #[instrument(skip(self), fields(code = %code, actor = %actor))]
    pub async fn verify_payment(
        &self,
        code: &str,
        actor: &str,
    ) -> Result<order::Model, ServiceError> {
        let order = self.find_order(code).await?;
        if order.payment_status()? != PaymentStatus::PendingVerification {
            return Err(ServiceError::InvalidOperation(
                "Only payments awaiting verification can be verified".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        let mut active: order::ActiveModel = order.into();
        active.payment_verified = Set(true);
        active.payment_status = Set(PaymentStatus::Verified.to_string());
        active.status = Set(OrderStatus::Confirmed.to_string());
        active.payment_verified_at = Set(Some(now));
        active.payment_verified_by = Set(Some(actor.to_string()));
        active.updated_at = Set(now);
        let updated = active.update(&*self.db).await?;

        info!(code = %code, actor = %actor, "Payment verified");

        self.events
            .send_or_log(Event::PaymentVerified(PaymentVerifiedNotice {
                code: code.to_string(),
                customer_name: updated.customer_name.clone(),
                contact_number: updated.contact_number.clone(),
                total_price: updated.total_price,
                verified_by: actor.to_string(),
                at: now,
            }));

        Ok(updated)
    }

    /// Rejects a submitted payment. Same precondition as verification: the
    /// payment must be awaiting verification.
    #[instrument(skip(self), fields(code = %code, actor = %actor))]
    pub async fn reject_payment(
        &self,
        code: &str,
        reason: &str,
        actor: &str,
    ) -> Result<order::Model, ServiceError> {
        let order = self.find_order(code).await?;
        if order.payment_status()? != PaymentStatus::PendingVerification {
            return Err(ServiceError::InvalidOperation(
                "Only payments awaiting verification can be rejected".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        let mut active: order::ActiveModel = order.into();
        active.payment_verified = Set(false);
        active.payment_status = Set(PaymentStatus::Rejected.to_string());
        active.payment_verified_at = Set(Some(now));
        active.payment_verified_by = Set(Some(actor.to_string()));
        active.updated_at = Set(now);
        let updated = active.update(&*self.db).await?;

        warn!(code = %code, actor = %actor, reason = %reason, "Payment rejected");

        self.events
            .send_or_log(Event::PaymentRejected(PaymentRejectedNotice {
                code: code.to_string(),
                customer_name: updated.customer_name.clone(),
                contact_number: updated.contact_number.clone(),
                total_price: updated.total_price,
                reason: reason.to_string(),
                rejected_by: actor.to_string(),
                at: now,
            }));

        Ok(updated)
    }

    /// Records a tracking number and marks the order shipped.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn add_tracking(
        &self,
        code: &str,
        tracking_number: &str,
    ) -> Result<ShippingResult, ServiceError> {
        if tracking_number.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Tracking number required".to_string(),
            ));
        }

        let order = self.find_order(code).await?;
        let now = chrono::Utc::now();
        let mut active: order::ActiveModel = order.into();
        active.tracking_number = Set(Some(tracking_number.to_string()));
        active.status = Set(OrderStatus::Shipped.to_string());
        active.updated_at = Set(now);
        let updated = active.update(&*self.db).await?;

        info!(code = %code, tracking = %tracking_number, "Order shipped");

        let settings = self.settings.load().await?;
        let customer_message = render_template(
            &settings.shipping_message,
            &[
                ("customer_name", updated.customer_name.as_str()),
                ("order_id", code),
                ("tracking_number", tracking_number),
            ],
        );
        let link = whatsapp_link(&updated.contact_number, Some(&customer_message));

        self.events.send_or_log(Event::OrderShipped(OrderShippedNotice {
            code: code.to_string(),
            customer_name: updated.customer_name.clone(),
            contact_number: updated.contact_number.clone(),
            tracking_number: tracking_number.to_string(),
            at: now,
        }));

        Ok(ShippingResult {
            order: updated,
            customer_message,
            whatsapp_link: link,
        })
    }

    #[instrument(skip(self), fields(code = %code, actor = %actor))]
    pub async fn complete(&self, code: &str, actor: &str) -> Result<order::Model, ServiceError> {
        let order = self.find_order(code).await?;
        let mut active: order::ActiveModel = order.into();
        active.status = Set(OrderStatus::Completed.to_string());
        active.updated_at = Set(chrono::Utc::now());
        let updated = active.update(&*self.db).await?;

        info!(code = %code, "Order completed");
        self.events
            .send_or_log(Event::OrderCompleted(OrderActionNotice::completed(
                code.to_string(),
                updated.customer_name.clone(),
                updated.contact_number.clone(),
                updated.total_price,
                actor.to_string(),
            )));
        Ok(updated)
    }

    /// Cancels the order; the payment state mirrors the cancellation.
    #[instrument(skip(self), fields(code = %code, actor = %actor))]
    pub async fn cancel(&self, code: &str, actor: &str) -> Result<order::Model, ServiceError> {
        let order = self.find_order(code).await?;
        let mut active: order::ActiveModel = order.into();
        active.status = Set(OrderStatus::Cancelled.to_string());
        active.payment_status = Set(PaymentStatus::Cancelled.to_string());
        active.updated_at = Set(chrono::Utc::now());
        let updated = active.update(&*self.db).await?;

        info!(code = %code, "Order cancelled");
        self.events
            .send_or_log(Event::OrderCancelled(OrderActionNotice::cancelled(
                code.to_string(),
                updated.customer_name.clone(),
                updated.contact_number.clone(),
                updated.total_price,
                actor.to_string(),
            )));
        Ok(updated)
    }

    /// Admin field edit. A state change that moves the order across regions
    /// recomputes the shipping fee and total from the item snapshot.
    #[instrument(skip(self, request), fields(code = %code, actor = %actor))]
    pub async fn update_order(
        &self,
        code: &str,
        request: UpdateOrderRequest,
        actor: &str,
    ) -> Result<order::Model, ServiceError> {
        request.validate()?;
        let status = OrderStatus::from_str(&request.status).map_err(|_| {
            ServiceError::InvalidStatus(format!("Unknown order status: {}", request.status))
        })?;
        let payment_status = PaymentStatus::from_str(&request.payment_status).map_err(|_| {
            ServiceError::InvalidStatus(format!(
                "Unknown payment status: {}",
                request.payment_status
            ))
        })?;

        let order = self.find_order(code).await?;
        let new_region = Region::for_state(&request.state);
        let region_changed = new_region != order.region();

        let mut active: order::ActiveModel = order.into();
        active.customer_name = Set(request.customer_name.clone());
        active.contact_number = Set(request.contact_number.clone());
        active.address = Set(request.address);
        active.postcode = Set(request.postcode.clone());
        active.state = Set(request.state.clone());
        active.status = Set(status.to_string());
        active.payment_status = Set(payment_status.to_string());
        active.tracking_number = Set(request.tracking_number);
        active.updated_at = Set(chrono::Utc::now());

        if region_changed {
            let items = self.find_items(code).await?;
            let subtotal: Decimal = items.iter().map(|i| i.line_total()).sum();
            let fee = new_region.shipping_fee();
            active.region = Set(new_region.to_string());
            active.shipping_fee = Set(fee);
            active.total_price = Set(subtotal + fee);
        }

        let updated = active.update(&*self.db).await?;
        info!(code = %code, region_changed, "Order updated");

        self.events.send_or_log(Event::OrderUpdated(OrderUpdatedNotice {
            code: code.to_string(),
            customer_name: request.customer_name,
            contact_number: request.contact_number,
            postcode: request.postcode,
            state: request.state,
            status: status.to_string(),
            payment_status: payment_status.to_string(),
            updated_by: actor.to_string(),
            at: updated.updated_at,
        }));

        Ok(updated)
    }

    /// Replaces the item snapshot wholesale and recomputes the total with
    /// the order's current region fee. Runs in one transaction.
    #[instrument(skip(self, selections), fields(code = %code, actor = %actor))]
    pub async fn replace_items(
        &self,
        code: &str,
        selections: Vec<ItemSelection>,
        actor: &str,
    ) -> Result<OrderDetails, ServiceError> {
        use crate::entities::product;

        let order = self.find_order(code).await?;
        let fee = order.region().shipping_fee();

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, code = %code, "Failed to start item-edit transaction");
            ServiceError::DatabaseError(e)
        })?;

        order_item::Entity::delete_many()
            .filter(order_item::Column::OrderCode.eq(code))
            .exec(&txn)
            .await?;

        let mut items = Vec::new();
        let mut subtotal = Decimal::ZERO;
        for selection in selections {
            if selection.quantity <= 0 {
                continue;
            }
            let Some(product) = product::Entity::find_by_id(selection.product_id)
                .one(&txn)
                .await?
            else {
                continue;
            };

            let item = order_item::ActiveModel {
                order_code: Set(code.to_string()),
                product_id: Set(product.id),
                product_name: Set(product.name.clone()),
                quantity: Set(selection.quantity),
                price: Set(product.price),
                weight: Set(product.weight),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            subtotal += item.line_total();
            items.push(item);
        }

        let total = subtotal + fee;
        let mut active: order::ActiveModel = order.into();
        active.total_price = Set(total);
        active.updated_at = Set(chrono::Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, code = %code, "Failed to commit item edit");
            ServiceError::DatabaseError(e)
        })?;

        info!(code = %code, total = %total, items = items.len(), "Order items replaced");

        self.events
            .send_or_log(Event::OrderItemsEdited(OrderItemsEditedNotice {
                code: code.to_string(),
                customer_name: updated.customer_name.clone(),
                contact_number: updated.contact_number.clone(),
                new_total: total,
                lines: items
                    .iter()
                    .map(|i| NoticeLine {
                        product_name: i.product_name.clone(),
                        quantity: i.quantity,
                        line_total: i.line_total(),
                    })
                    .collect(),
                updated_by: actor.to_string(),
                at: updated.updated_at,
            }));

        Ok(OrderDetails {
            order: updated,
            items,
        })
    }

    /// Deletes the order and its items, items first.
    #[instrument(skip(self), fields(code = %code, actor = %actor))]
    pub async fn delete(&self, code: &str, actor: &str) -> Result<(), ServiceError> {
        let order = self.find_order(code).await?;

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, code = %code, "Failed to start delete transaction");
            ServiceError::DatabaseError(e)
        })?;

        order_item::Entity::delete_many()
            .filter(order_item::Column::OrderCode.eq(code))
            .exec(&txn)
            .await?;
        order::Entity::delete_by_id(order.id).exec(&txn).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, code = %code, "Failed to commit order delete");
            ServiceError::DatabaseError(e)
        })?;

        info!(code = %code, "Order deleted");

        self.events
            .send_or_log(Event::OrderDeleted(OrderActionNotice::deleted(
                code.to_string(),
                order.customer_name,
                order.contact_number,
                order.total_price,
                actor.to_string(),
            )));
        Ok(())
    }

    /// Builds the public payment link and the admin-to-customer WhatsApp
    /// message from the configured template.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn generate_payment_link(
        &self,
        code: &str,
    ) -> Result<PaymentLinkResult, ServiceError> {
        let order = self.find_order(code).await?;
        let payment_link = self.payment_link(code);

        let settings = self.settings.load().await?;
        let total = format!("{:.2}", order.total_price);
        let method = order.payment_method.clone().unwrap_or_default();
        let message = render_template(
            &settings.whatsapp_message,
            &[
                ("customer_name", order.customer_name.as_str()),
                ("order_id", code),
                ("total_price", total.as_str()),
                ("payment_method", method.as_str()),
            ],
        );
        let link = whatsapp_link(&order.contact_number, Some(&message));

        self.events
            .send_or_log(Event::PaymentLinkGenerated(PaymentLinkNotice {
                code: code.to_string(),
                customer_name: order.customer_name,
                contact_number: order.contact_number,
                total_price: order.total_price,
                payment_link: payment_link.clone(),
            }));

        Ok(PaymentLinkResult {
            payment_link,
            whatsapp_link: link,
            whatsapp_message: message,
        })
    }

    /// Counters and worklists for the admin dashboard. Revenue counts each
    /// verified order's total exactly once.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        use crate::entities::product;

        let product_count = product::Entity::find().count(&*self.db).await?;
        let order_count = order::Entity::find().count(&*self.db).await?;

        let verified = order::Entity::find()
            .filter(order::Column::PaymentVerified.eq(true))
            .all(&*self.db)
            .await?;
        let total_revenue = verified.iter().map(|o| o.total_price).sum();

        let recent_orders = order::Entity::find()
            .order_by_desc(order::Column::CreatedAt)
            .limit(10)
            .all(&*self.db)
            .await?;

        let orders_to_verify = order::Entity::find()
            .filter(
                order::Column::PaymentStatus.eq(PaymentStatus::PendingVerification.to_string()),
            )
            .order_by_desc(order::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        let pending_payments = orders_to_verify.len() as u64;

        Ok(DashboardSummary {
            product_count,
            order_count,
            pending_payments,
            total_revenue,
            recent_orders,
            orders_to_verify,
        })
    }
}
