//! Shared fixtures for integration tests. Everything runs against an
//! in-memory SQLite database with the seed migrations applied.

#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use snackshop_api::events::EventSender;
use snackshop_api::migrator::Migrator;
use snackshop_api::services::cart::CartService;
use snackshop_api::services::catalog::CatalogService;
use snackshop_api::services::orders::{CheckoutRequest, OrderService};
use snackshop_api::services::reports::ReportService;
use snackshop_api::services::settings::SettingsService;
use snackshop_api::services::uploads::UploadStore;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub cart: CartService,
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub reports: ReportService,
    pub settings: SettingsService,
    pub uploads: UploadStore,
    pub receipt_dir: PathBuf,
    pub product_image_dir: PathBuf,
    // Held so the upload directories outlive the test.
    _upload_root: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Arc::new(memory_db().await);

        let upload_root = TempDir::new().expect("temp upload root");
        let receipt_dir = upload_root.path().join("receipts");
        let product_image_dir = upload_root.path().join("product_images");
        let uploads = UploadStore::new(&receipt_dir, &product_image_dir);
        uploads.ensure_dirs().await.expect("upload dirs");

        let settings = SettingsService::new(db.clone());
        let orders = OrderService::new(
            db.clone(),
            EventSender::noop(),
            uploads.clone(),
            settings.clone(),
            "EF".to_string(),
            "http://localhost:8080/".to_string(),
        );

        Self {
            cart: CartService::new(db.clone()),
            catalog: CatalogService::new(db.clone(), uploads.clone()),
            reports: ReportService::new(db.clone()),
            orders,
            settings,
            uploads,
            receipt_dir,
            product_image_dir,
            db,
            _upload_root: upload_root,
        }
    }

    /// Fills a session cart and returns its resolved view.
    pub async fn cart_with(
        &self,
        session: &str,
        selections: &[(i32, i32)],
    ) -> snackshop_api::services::cart::CartView {
        let map: HashMap<i32, i32> = selections.iter().copied().collect();
        self.cart.replace(session, map).await.expect("cart replace")
    }
}

/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts).await.expect("in-memory sqlite");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

pub fn checkout_request(state: &str) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Aisha Rahman".to_string(),
        contact_number: "0123456789".to_string(),
        address: "12 Jalan Bukit".to_string(),
        postcode: "40000".to_string(),
        state: state.to_string(),
    }
}
