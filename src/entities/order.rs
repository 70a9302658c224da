use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::errors::ServiceError;
use crate::shipping::Region;

/// Fulfilment state of an order.
///
/// `reserved → confirmed → shipped → completed`, with `cancelled` reachable
/// from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Reserved,
    Confirmed,
    Shipped,
    Completed,
    Cancelled,
}

/// Payment verification state of an order.
///
/// `pending → pending_verification → {verified | rejected}`; `cancelled`
/// mirrors an order cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    PendingVerification,
    Verified,
    Rejected,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Human-friendly order code: two-letter prefix + four digits, unique.
    #[sea_orm(unique)]
    pub code: String,

    pub customer_name: String,
    pub contact_number: String,
    pub address: String,
    pub postcode: String,
    pub state: String,
    pub region: String,
    pub shipping_fee: Decimal,
    pub total_price: Decimal,
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub payment_receipt: Option<String>,
    pub payment_verified: bool,
    pub payment_verified_at: Option<DateTime<Utc>>,
    pub payment_verified_by: Option<String>,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Result<OrderStatus, ServiceError> {
        OrderStatus::from_str(&self.status)
            .map_err(|_| ServiceError::InvalidStatus(format!("Unknown order status: {}", self.status)))
    }

    pub fn payment_status(&self) -> Result<PaymentStatus, ServiceError> {
        PaymentStatus::from_str(&self.payment_status).map_err(|_| {
            ServiceError::InvalidStatus(format!("Unknown payment status: {}", self.payment_status))
        })
    }

    pub fn region(&self) -> Region {
        Region::from_str(&self.region).unwrap_or(Region::East)
    }

    /// The payment page is open only while the order sits untouched in the
    /// reservation state.
    pub fn payment_open(&self) -> bool {
        self.status == OrderStatus::Reserved.to_string()
            && self.payment_status == PaymentStatus::Pending.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_use_snake_case() {
        assert_eq!(OrderStatus::Reserved.to_string(), "reserved");
        assert_eq!(
            PaymentStatus::PendingVerification.to_string(),
            "pending_verification"
        );
        assert_eq!(
            OrderStatus::from_str("cancelled").unwrap(),
            OrderStatus::Cancelled
        );
    }
}
