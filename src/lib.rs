pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod notifications;
pub mod services;
pub mod shipping;

#[cfg(test)]
pub(crate) mod test_support;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;

/// Request bodies may carry a 5 MiB upload plus multipart framing overhead.
const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Public storefront routes plus the admin login.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::products::list_ranked))
        .route("/cart", put(handlers::cart::replace))
        .route("/cart", get(handlers::cart::view))
        .route("/checkout", post(handlers::cart::checkout))
        .route("/reservations/{code}", get(handlers::cart::reservation))
        .route("/payment/{code}", get(handlers::payments::page))
        .route("/payment/{code}", post(handlers::payments::submit))
}

/// Admin routes, all behind the bearer-token guard.
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/change-password", post(handlers::auth::change_password))
        .route("/dashboard", get(handlers::dashboard::summary))
        .route(
            "/reports/reservations",
            get(handlers::dashboard::reservation_report),
        )
        .route("/products", get(handlers::products::list))
        .route("/products", post(handlers::products::create))
        .route("/products/{id}", get(handlers::products::get))
        .route("/products/{id}", put(handlers::products::update))
        .route("/products/{id}", delete(handlers::products::delete))
        .route("/orders", get(handlers::orders::list))
        .route("/orders/{code}", get(handlers::orders::get))
        .route("/orders/{code}", put(handlers::orders::update))
        .route("/orders/{code}", delete(handlers::orders::delete))
        .route("/orders/{code}/items", put(handlers::orders::replace_items))
        .route("/orders/{code}/verify", post(handlers::orders::verify_payment))
        .route("/orders/{code}/reject", post(handlers::orders::reject_payment))
        .route("/orders/{code}/tracking", post(handlers::orders::add_tracking))
        .route("/orders/{code}/complete", post(handlers::orders::complete))
        .route("/orders/{code}/cancel", post(handlers::orders::cancel))
        .route(
            "/orders/{code}/payment-link",
            post(handlers::orders::payment_link),
        )
        .route("/settings", get(handlers::settings::list))
        .route("/settings", put(handlers::settings::update))
        .route_layer(middleware::from_fn_with_state(
            state.services.auth.clone(),
            auth::require_admin,
        ))
        // Added after the guard so login stays reachable without a token.
        .route("/login", post(handlers::auth::login))
}

pub fn app_router(state: AppState) -> Router {
    let api = public_routes().nest("/admin", admin_routes(&state));

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
