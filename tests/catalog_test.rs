//! Catalog CRUD and the demand-ranked storefront listing.

mod common;

use common::{checkout_request, TestApp};
use rust_decimal_macros::dec;
use snackshop_api::errors::ServiceError;
use snackshop_api::services::catalog::ProductInput;

#[tokio::test]
async fn fresh_catalog_ranks_alphabetically() {
    let app = TestApp::new().await;
    let ranked = app.catalog.list_ranked().await.unwrap();

    assert_eq!(ranked.len(), 12);
    assert_eq!(ranked[0].name, "Chicken floss roll");
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].total_sold, 0);
    assert_eq!(ranked[11].name, "Soy chips original");
    assert_eq!(ranked[11].rank, 12);
}

#[tokio::test]
async fn demand_moves_products_up_the_ranking() {
    let app = TestApp::new().await;

    // Any reservation counts toward demand, verified or not.
    let cart = app.cart_with("c1", &[(4, 3), (1, 1)]).await;
    app.orders
        .reserve(cart, checkout_request("Selangor"))
        .await
        .unwrap();

    let ranked = app.catalog.list_ranked().await.unwrap();
    assert_eq!(ranked[0].name, "Crispy seaweed cracker");
    assert_eq!(ranked[0].total_sold, 3);
    assert_eq!(ranked[0].order_count, 1);
    assert_eq!(ranked[1].name, "Chicken floss roll");
    assert_eq!(ranked[1].total_sold, 1);
}

#[tokio::test]
async fn product_crud_round_trip() {
    let app = TestApp::new().await;

    let created = app
        .catalog
        .create(
            ProductInput {
                name: "Banana chips".to_string(),
                price: dec!(9.50),
                weight: 0.25,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(created.name, "Banana chips");

    let updated = app
        .catalog
        .update(
            created.id,
            ProductInput {
                name: "Banana chips (large)".to_string(),
                price: dec!(14.00),
                weight: 0.40,
            },
            None,
            false,
        )
        .await
        .unwrap();
    assert_eq!(updated.price, dec!(14.00));

    app.catalog.delete(created.id).await.unwrap();
    let err = app.catalog.get(created.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn failed_create_removes_the_stored_image() {
    let app = TestApp::new().await;

    let image = app
        .uploads
        .store_product_image("snack.png", b"image bytes")
        .await
        .unwrap();
    assert!(app.product_image_dir.join(&image).exists());

    let err = app
        .catalog
        .create(
            ProductInput {
                name: "Bad snack".to_string(),
                price: dec!(-1.00),
                weight: 0.2,
            },
            Some(image.clone()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
    assert!(!app.product_image_dir.join(&image).exists());
}

#[tokio::test]
async fn failed_update_removes_the_new_image_and_keeps_the_old_one() {
    let app = TestApp::new().await;

    let original = app
        .uploads
        .store_product_image("before.png", b"old bytes")
        .await
        .unwrap();
    let created = app
        .catalog
        .create(
            ProductInput {
                name: "Pictured snack".to_string(),
                price: dec!(8.00),
                weight: 0.2,
            },
            Some(original.clone()),
        )
        .await
        .unwrap();

    let replacement = app
        .uploads
        .store_product_image("after.png", b"new bytes")
        .await
        .unwrap();
    let err = app
        .catalog
        .update(
            99999,
            ProductInput {
                name: "Pictured snack".to_string(),
                price: dec!(8.00),
                weight: 0.2,
            },
            Some(replacement.clone()),
            false,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(!app.product_image_dir.join(&replacement).exists());

    // The existing product and its image are untouched.
    let kept = app.catalog.get(created.id).await.unwrap();
    assert_eq!(kept.image_url.as_deref(), Some(original.as_str()));
    assert!(app.product_image_dir.join(&original).exists());
}

#[tokio::test]
async fn successful_create_keeps_the_stored_image() {
    let app = TestApp::new().await;

    let image = app
        .uploads
        .store_product_image("keeper.png", b"image bytes")
        .await
        .unwrap();
    let created = app
        .catalog
        .create(
            ProductInput {
                name: "Keeper snack".to_string(),
                price: dec!(6.00),
                weight: 0.15,
            },
            Some(image.clone()),
        )
        .await
        .unwrap();
    assert_eq!(created.image_url.as_deref(), Some(image.as_str()));
    assert!(app.product_image_dir.join(&image).exists());
}

#[tokio::test]
async fn non_positive_prices_and_weights_are_rejected() {
    let app = TestApp::new().await;

    let err = app
        .catalog
        .create(
            ProductInput {
                name: "Free snack".to_string(),
                price: dec!(0),
                weight: 0.1,
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = app
        .catalog
        .create(
            ProductInput {
                name: "Weightless".to_string(),
                price: dec!(5.00),
                weight: 0.0,
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}
