pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod payments;
pub mod products;
pub mod settings;

use crate::auth::AdminAuthService;
use crate::config::AppConfig;
use crate::events::EventSender;
use crate::services::cart::CartService;
use crate::services::catalog::CatalogService;
use crate::services::orders::OrderService;
use crate::services::reports::ReportService;
use crate::services::settings::SettingsService;
use crate::services::uploads::UploadStore;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub use crate::AppState;

/// Services layer wired once at startup and shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
    pub cart: CartService,
    pub orders: OrderService,
    pub settings: SettingsService,
    pub reports: ReportService,
    pub auth: AdminAuthService,
    pub uploads: UploadStore,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender, config: &AppConfig) -> Self {
        let uploads = UploadStore::new(&config.receipt_dir, &config.product_image_dir);
        let settings = SettingsService::new(db.clone());
        Self {
            catalog: CatalogService::new(db.clone(), uploads.clone()),
            cart: CartService::new(db.clone()),
            orders: OrderService::new(
                db.clone(),
                event_sender,
                uploads.clone(),
                settings.clone(),
                config.order_code_prefix.clone(),
                config.public_base_url(),
            ),
            settings,
            reports: ReportService::new(db.clone()),
            auth: AdminAuthService::new(db, config.session_ttl_secs),
            uploads,
        }
    }
}
