use crate::auth::AdminIdentity;
use crate::entities::order;
use crate::services::orders::{
    ItemSelection, OrderDetails, OrderSummary, PaymentLinkResult, ShippingResult,
    UpdateOrderRequest,
};
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde::Deserialize;

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<OrderSummary>> {
    let orders = state.services.orders.list().await?;
    Ok(Json(ApiResponse::success(orders)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<OrderDetails> {
    let details = state.services.orders.get(&code).await?;
    Ok(Json(ApiResponse::success(details)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(code): Path<String>,
    Json(request): Json<UpdateOrderRequest>,
) -> ApiResult<order::Model> {
    let updated = state
        .services
        .orders
        .update_order(&code, request, &admin.username)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceItemsRequest {
    pub items: Vec<ItemSelection>,
}

pub async fn replace_items(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(code): Path<String>,
    Json(request): Json<ReplaceItemsRequest>,
) -> ApiResult<OrderDetails> {
    let details = state
        .services
        .orders
        .replace_items(&code, request.items, &admin.username)
        .await?;
    Ok(Json(ApiResponse::success(details)))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(code): Path<String>,
) -> ApiResult<order::Model> {
    let updated = state
        .services
        .orders
        .verify_payment(&code, &admin.username)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[derive(Debug, Deserialize)]
pub struct RejectPaymentRequest {
    pub reason: String,
}

pub async fn reject_payment(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(code): Path<String>,
    Json(request): Json<RejectPaymentRequest>,
) -> ApiResult<order::Model> {
    if request.reason.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "Rejection reason is required".to_string(),
        ));
    }
    let updated = state
        .services
        .orders
        .reject_payment(&code, &request.reason, &admin.username)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[derive(Debug, Deserialize)]
pub struct AddTrackingRequest {
    pub tracking_number: String,
}

pub async fn add_tracking(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(request): Json<AddTrackingRequest>,
) -> ApiResult<ShippingResult> {
    let result = state
        .services
        .orders
        .add_tracking(&code, &request.tracking_number)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn complete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(code): Path<String>,
) -> ApiResult<order::Model> {
    let updated = state.services.orders.complete(&code, &admin.username).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn cancel(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(code): Path<String>,
) -> ApiResult<order::Model> {
    let updated = state.services.orders.cancel(&code, &admin.username).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(code): Path<String>,
) -> ApiResult<()> {
    state.services.orders.delete(&code, &admin.username).await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn payment_link(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<PaymentLinkResult> {
    let result = state.services.orders.generate_payment_link(&code).await?;
    Ok(Json(ApiResponse::success(result)))
}
