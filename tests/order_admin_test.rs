//! Admin order management: field edits, item edits, deletion, and the
//! payment link builder.

mod common;

use common::{checkout_request, TestApp};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use snackshop_api::entities::order_item;
use snackshop_api::errors::ServiceError;
use snackshop_api::services::orders::{ItemSelection, UpdateOrderRequest};

fn update_request(state: &str) -> UpdateOrderRequest {
    UpdateOrderRequest {
        customer_name: "Aisha Rahman".to_string(),
        contact_number: "0123456789".to_string(),
        address: "12 Jalan Bukit".to_string(),
        postcode: "40000".to_string(),
        state: state.to_string(),
        status: "reserved".to_string(),
        payment_status: "pending".to_string(),
        tracking_number: None,
    }
}

#[tokio::test]
async fn replacing_items_recomputes_the_total_with_the_region_fee() {
    let app = TestApp::new().await;
    let cart = app.cart_with("a1", &[(1, 1)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Sabah"))
        .await
        .unwrap();
    let code = details.order.code.clone();
    assert_eq!(details.order.total_price, dec!(40.00));

    // 2 x Low sugar twisted roll at 15.00, east shipping stays 15.00.
    let edited = app
        .orders
        .replace_items(
            &code,
            vec![ItemSelection {
                product_id: 7,
                quantity: 2,
            }],
            "admin",
        )
        .await
        .unwrap();
    assert_eq!(edited.order.total_price, dec!(45.00));
    assert_eq!(edited.items.len(), 1);
    assert_eq!(edited.items[0].product_name, "Low sugar twisted roll");
    assert_eq!(edited.items[0].quantity, 2);
}

#[tokio::test]
async fn item_edits_skip_unknown_products_and_bad_quantities() {
    let app = TestApp::new().await;
    let cart = app.cart_with("a2", &[(1, 1)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    let edited = app
        .orders
        .replace_items(
            &code,
            vec![
                ItemSelection {
                    product_id: 99999,
                    quantity: 3,
                },
                ItemSelection {
                    product_id: 1,
                    quantity: 0,
                },
                ItemSelection {
                    product_id: 4,
                    quantity: 1,
                },
            ],
            "admin",
        )
        .await
        .unwrap();
    // Only the seaweed cracker survives: 10.00 + 7.00 west shipping.
    assert_eq!(edited.items.len(), 1);
    assert_eq!(edited.order.total_price, dec!(17.00));
}

#[tokio::test]
async fn moving_the_order_across_regions_recomputes_shipping() {
    let app = TestApp::new().await;
    let cart = app.cart_with("a3", &[(1, 2)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();
    assert_eq!(details.order.total_price, dec!(57.00));

    let moved = app
        .orders
        .update_order(&code, update_request("Sarawak"), "admin")
        .await
        .unwrap();
    assert_eq!(moved.region, "east");
    assert_eq!(moved.shipping_fee, dec!(15.00));
    assert_eq!(moved.total_price, dec!(65.00));

    let back = app
        .orders
        .update_order(&code, update_request("Penang"), "admin")
        .await
        .unwrap();
    assert_eq!(back.region, "west");
    assert_eq!(back.total_price, dec!(57.00));
}

#[tokio::test]
async fn same_region_edits_leave_the_total_alone() {
    let app = TestApp::new().await;
    let cart = app.cart_with("a4", &[(1, 2)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    let mut request = update_request("Johor");
    request.customer_name = "Nur Iman".to_string();
    let updated = app.orders.update_order(&code, request, "admin").await.unwrap();
    assert_eq!(updated.customer_name, "Nur Iman");
    assert_eq!(updated.region, "west");
    assert_eq!(updated.total_price, dec!(57.00));
}

#[tokio::test]
async fn unknown_statuses_are_rejected() {
    let app = TestApp::new().await;
    let cart = app.cart_with("a5", &[(1, 1)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    let mut request = update_request("Selangor");
    request.status = "archived".to_string();
    let err = app
        .orders
        .update_order(&code, request, "admin")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidStatus(_)));
}

#[tokio::test]
async fn deleting_an_order_removes_its_items() {
    let app = TestApp::new().await;
    let cart = app.cart_with("a6", &[(1, 2), (4, 1)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();
    assert_eq!(details.items.len(), 2);

    app.orders.delete(&code, "admin").await.unwrap();

    let err = app.orders.get(&code).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    let orphans = order_item::Entity::find()
        .filter(order_item::Column::OrderCode.eq(code.as_str()))
        .count(&*app.db)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn payment_link_renders_the_whatsapp_template() {
    let app = TestApp::new().await;
    let cart = app.cart_with("a7", &[(1, 2)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    let link = app.orders.generate_payment_link(&code).await.unwrap();
    assert_eq!(
        link.payment_link,
        format!("http://localhost:8080/payment/{}", code)
    );
    assert!(link.whatsapp_message.contains(&code));
    assert!(link.whatsapp_message.contains("57.00"));
    assert!(link.whatsapp_link.starts_with("https://wa.me/60123456789?text="));
}

#[tokio::test]
async fn order_list_carries_item_counts_newest_first() {
    let app = TestApp::new().await;

    let cart = app.cart_with("a8", &[(1, 1)]).await;
    app.orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let cart = app.cart_with("a9", &[(1, 1), (4, 2)]).await;
    let second = app
        .orders
        .reserve(cart, checkout_request("Sabah"))
        .await
        .unwrap();

    let list = app.orders.list().await.unwrap();
    assert_eq!(list.len(), 2);
    let latest = list
        .iter()
        .find(|s| s.order.code == second.order.code)
        .unwrap();
    assert_eq!(latest.item_count, 2);
}
