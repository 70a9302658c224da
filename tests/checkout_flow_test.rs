//! End-to-end order lifecycle: cart, reservation, payment submission,
//! verification, shipping, completion.

mod common;

use common::{checkout_request, TestApp};
use rust_decimal_macros::dec;
use snackshop_api::entities::order::{OrderStatus, PaymentStatus};
use snackshop_api::errors::ServiceError;
use snackshop_api::services::orders::UpdateOrderRequest;

#[tokio::test]
async fn selangor_checkout_reserves_with_west_shipping() {
    let app = TestApp::new().await;

    // 2 x Chicken floss roll at 25.00
    let cart = app.cart_with("s1", &[(1, 2)]).await;
    assert_eq!(cart.subtotal, dec!(50.00));

    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();

    let order = &details.order;
    assert!(order.code.starts_with("EF"));
    assert_eq!(order.code.len(), 6);
    assert_eq!(order.region, "west");
    assert_eq!(order.shipping_fee, dec!(7.00));
    assert_eq!(order.total_price, dec!(57.00));
    assert_eq!(order.status().unwrap(), OrderStatus::Reserved);
    assert_eq!(order.payment_status().unwrap(), PaymentStatus::Pending);
    assert_eq!(details.items.len(), 1);
    assert_eq!(details.items[0].quantity, 2);
}

#[tokio::test]
async fn east_malaysia_states_and_unknown_states_get_east_shipping() {
    let app = TestApp::new().await;

    let cart = app.cart_with("s2", &[(1, 1)]).await;
    let sabah = app
        .orders
        .reserve(cart, checkout_request("Sabah"))
        .await
        .unwrap();
    assert_eq!(sabah.order.region, "east");
    assert_eq!(sabah.order.shipping_fee, dec!(15.00));
    assert_eq!(sabah.order.total_price, dec!(40.00));

    let cart = app.cart_with("s3", &[(1, 1)]).await;
    let unknown = app
        .orders
        .reserve(cart, checkout_request("Atlantis"))
        .await
        .unwrap();
    assert_eq!(unknown.order.region, "east");
    assert_eq!(unknown.order.shipping_fee, dec!(15.00));
}

#[tokio::test]
async fn empty_cart_cannot_be_reserved() {
    let app = TestApp::new().await;
    let cart = app.cart.view("nobody").await.unwrap();
    let err = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn invalid_contact_number_is_rejected() {
    let app = TestApp::new().await;
    let cart = app.cart_with("s4", &[(1, 1)]).await;
    let mut request = checkout_request("Selangor");
    request.contact_number = "+60123456789".to_string();
    let err = app.orders.reserve(cart, request).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn payment_submission_moves_to_pending_verification() {
    let app = TestApp::new().await;
    let cart = app.cart_with("s5", &[(1, 2)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    assert!(app.orders.payment_page(&code).await.is_ok());

    let updated = app
        .orders
        .submit_payment(&code, "Bank Transfer", "slip.jpg", b"receipt bytes")
        .await
        .unwrap();
    assert_eq!(
        updated.payment_status().unwrap(),
        PaymentStatus::PendingVerification
    );
    assert_eq!(updated.payment_method.as_deref(), Some("Bank Transfer"));
    let receipt = updated.payment_receipt.clone().unwrap();
    assert!(receipt.starts_with(&format!("receipt_{}_", code)));
    assert!(receipt.ends_with(".jpg"));

    // The payment page closes once a receipt is in.
    let err = app.orders.payment_page(&code).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
    let err = app
        .orders
        .submit_payment(&code, "Bank Transfer", "slip.jpg", b"again")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn receipt_size_limit_is_inclusive_at_five_mebibytes() {
    let app = TestApp::new().await;
    let cart = app.cart_with("s6", &[(1, 1)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    let too_big = vec![0u8; 5 * 1024 * 1024 + 1];
    let err = app
        .orders
        .submit_payment(&code, "Bank Transfer", "slip.png", &too_big)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UploadError(_)));

    let exactly = vec![0u8; 5 * 1024 * 1024];
    app.orders
        .submit_payment(&code, "Bank Transfer", "slip.png", &exactly)
        .await
        .unwrap();
}

#[tokio::test]
async fn verification_confirms_the_order_and_counts_revenue_once() {
    let app = TestApp::new().await;
    let cart = app.cart_with("s7", &[(1, 2)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    // Verification requires a submitted payment.
    let err = app.orders.verify_payment(&code, "admin").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));

    app.orders
        .submit_payment(&code, "Touch 'n Go (TnG)", "slip.png", b"bytes")
        .await
        .unwrap();

    let verified = app.orders.verify_payment(&code, "admin").await.unwrap();
    assert!(verified.payment_verified);
    assert_eq!(verified.payment_status().unwrap(), PaymentStatus::Verified);
    assert_eq!(verified.status().unwrap(), OrderStatus::Confirmed);
    assert_eq!(verified.payment_verified_by.as_deref(), Some("admin"));
    assert!(verified.payment_verified_at.is_some());

    // A second verify is rejected, so revenue stays counted once.
    let err = app.orders.verify_payment(&code, "admin").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));

    let dashboard = app.orders.dashboard().await.unwrap();
    assert_eq!(dashboard.total_revenue, dec!(57.00));
    assert_eq!(dashboard.order_count, 1);
    assert_eq!(dashboard.pending_payments, 0);
}

#[tokio::test]
async fn dashboard_counts_pending_payments_from_the_verification_worklist() {
    let app = TestApp::new().await;

    let first_cart = app.cart_with("s20", &[(1, 1)]).await;
    let first = app
        .orders
        .reserve(first_cart, checkout_request("Selangor"))
        .await
        .unwrap();
    app.orders
        .submit_payment(&first.order.code, "Bank Transfer", "slip.png", b"bytes")
        .await
        .unwrap();

    // A reserved order with no receipt stays off the worklist.
    let second_cart = app.cart_with("s21", &[(4, 2)]).await;
    app.orders
        .reserve(second_cart, checkout_request("Johor"))
        .await
        .unwrap();

    let dashboard = app.orders.dashboard().await.unwrap();
    assert_eq!(dashboard.pending_payments, 1);
    assert_eq!(
        dashboard.pending_payments,
        dashboard.orders_to_verify.len() as u64
    );
    assert_eq!(dashboard.orders_to_verify[0].code, first.order.code);
    assert_eq!(dashboard.order_count, 2);
}

#[tokio::test]
async fn rejection_requires_a_submitted_payment() {
    let app = TestApp::new().await;
    let cart = app.cart_with("s8", &[(1, 1)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    let err = app
        .orders
        .reject_payment(&code, "blurry receipt", "admin")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));

    app.orders
        .submit_payment(&code, "Bank Transfer", "slip.png", b"bytes")
        .await
        .unwrap();
    let rejected = app
        .orders
        .reject_payment(&code, "blurry receipt", "admin")
        .await
        .unwrap();
    assert!(!rejected.payment_verified);
    assert_eq!(rejected.payment_status().unwrap(), PaymentStatus::Rejected);

    // Rejected payments cannot be verified either.
    let err = app.orders.verify_payment(&code, "admin").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn tracking_ships_the_order_with_a_customer_message() {
    let app = TestApp::new().await;
    let cart = app.cart_with("s9", &[(1, 1)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    let err = app.orders.add_tracking(&code, "   ").await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let shipped = app.orders.add_tracking(&code, "MY987654321").await.unwrap();
    assert_eq!(shipped.order.status().unwrap(), OrderStatus::Shipped);
    assert_eq!(
        shipped.order.tracking_number.as_deref(),
        Some("MY987654321")
    );
    assert!(shipped.customer_message.contains("MY987654321"));
    assert!(shipped.whatsapp_link.starts_with("https://wa.me/60123456789"));

    let completed = app.orders.complete(&code, "admin").await.unwrap();
    assert_eq!(completed.status().unwrap(), OrderStatus::Completed);
}

#[tokio::test]
async fn cancelling_mirrors_the_payment_status() {
    let app = TestApp::new().await;
    let cart = app.cart_with("s10", &[(1, 1)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    let cancelled = app.orders.cancel(&code, "admin").await.unwrap();
    assert_eq!(cancelled.status().unwrap(), OrderStatus::Cancelled);
    assert_eq!(
        cancelled.payment_status().unwrap(),
        PaymentStatus::Cancelled
    );
}

#[tokio::test]
async fn payment_page_is_open_only_for_reserved_pending_orders() {
    let app = TestApp::new().await;
    let cart = app.cart_with("s11", &[(1, 1)]).await;
    let details = app
        .orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();
    let code = details.order.code.clone();

    let statuses = ["reserved", "confirmed", "shipped", "completed", "cancelled"];
    let payment_statuses = [
        "pending",
        "pending_verification",
        "verified",
        "rejected",
        "cancelled",
    ];

    for status in statuses {
        for payment_status in payment_statuses {
            app.orders
                .update_order(
                    &code,
                    UpdateOrderRequest {
                        customer_name: "Aisha Rahman".to_string(),
                        contact_number: "0123456789".to_string(),
                        address: "12 Jalan Bukit".to_string(),
                        postcode: "40000".to_string(),
                        state: "Selangor".to_string(),
                        status: status.to_string(),
                        payment_status: payment_status.to_string(),
                        tracking_number: None,
                    },
                    "admin",
                )
                .await
                .unwrap();

            let open = status == "reserved" && payment_status == "pending";
            assert_eq!(
                app.orders.payment_page(&code).await.is_ok(),
                open,
                "payment page open={} expected for ({}, {})",
                !open,
                status,
                payment_status
            );
        }
    }
}
