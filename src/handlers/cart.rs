use crate::notifications::whatsapp_link;
use crate::services::cart::CartView;
use crate::services::orders::{CheckoutRequest, ItemSelection, OrderDetails};
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub const SESSION_HEADER: &str = "x-session-id";

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
pub struct ReplaceCartRequest {
    pub items: Vec<ItemSelection>,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub cart: CartView,
}

/// Replaces the session cart with the submitted selections. A missing
/// session header starts a new session; the id comes back in the response.
pub async fn replace(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ReplaceCartRequest>,
) -> ApiResult<CartResponse> {
    let session = session_id(&headers).unwrap_or_else(|| Uuid::new_v4().to_string());
    let selections: HashMap<i32, i32> = request
        .items
        .into_iter()
        .map(|s| (s.product_id, s.quantity))
        .collect();
    let cart = state.services.cart.replace(&session, selections).await?;
    Ok(Json(ApiResponse::success(CartResponse {
        session_id: session,
        cart,
    })))
}

pub async fn view(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<CartResponse> {
    let session = session_id(&headers).ok_or_else(|| {
        ServiceError::ValidationError("Missing session header".to_string())
    })?;
    let cart = state.services.cart.view(&session).await?;
    Ok(Json(ApiResponse::success(CartResponse {
        session_id: session,
        cart,
    })))
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    #[serde(flatten)]
    pub details: OrderDetails,
    pub payment_instructions: String,
    pub admin_whatsapp_link: String,
}

async fn reservation_response(
    state: &AppState,
    details: OrderDetails,
) -> Result<ReservationResponse, ServiceError> {
    let settings = state.services.settings.load().await?;
    let message = format!(
        "Hi, I've placed order {} for RM{:.2}. Please contact me for payment details.",
        details.order.code, details.order.total_price
    );
    let link = whatsapp_link(&settings.admin_whatsapp_number, Some(&message));
    Ok(ReservationResponse {
        details,
        payment_instructions: settings.payment_instructions,
        admin_whatsapp_link: link,
    })
}

/// Reserves the session cart as an order and clears the cart.
pub async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> ApiResult<ReservationResponse> {
    let session = session_id(&headers).ok_or_else(|| {
        ServiceError::ValidationError("Missing session header".to_string())
    })?;

    let cart = state.services.cart.view(&session).await?;
    let details = state.services.orders.reserve(cart, request).await?;
    state.services.cart.clear(&session);

    Ok(Json(ApiResponse::success(
        reservation_response(&state, details).await?,
    )))
}

/// Reservation confirmation by order code.
pub async fn reservation(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<ReservationResponse> {
    let details = state.services.orders.get(&code).await?;
    Ok(Json(ApiResponse::success(
        reservation_response(&state, details).await?,
    )))
}
