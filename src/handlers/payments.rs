use crate::entities::order;
use crate::entities::order_item;
use crate::services::orders::PAYMENT_METHODS;
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};
use serde::Serialize;

/// Payment details shown alongside the order: how to pay and where.
#[derive(Debug, Serialize)]
pub struct PaymentPageResponse {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
    pub payment_methods: Vec<String>,
    pub bank_name: String,
    pub bank_account_name: String,
    pub bank_account_number: String,
    pub tng_phone_number: String,
    pub payment_instructions: String,
}

/// Payment-page data, gated on the order still being open for payment.
pub async fn page(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<PaymentPageResponse> {
    let details = state.services.orders.payment_page(&code).await?;
    let settings = state.services.settings.load().await?;
    Ok(Json(ApiResponse::success(PaymentPageResponse {
        order: details.order,
        items: details.items,
        payment_methods: PAYMENT_METHODS.iter().map(|m| m.to_string()).collect(),
        bank_name: settings.bank_name,
        bank_account_name: settings.bank_account_name,
        bank_account_number: settings.bank_account_number,
        tng_phone_number: settings.tng_phone_number,
        payment_instructions: settings.payment_instructions,
    })))
}

/// Receipt upload: multipart with a `payment_method` field and a `receipt`
/// file.
pub async fn submit(
    State(state): State<AppState>,
    Path(code): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<order::Model> {
    let mut payment_method = String::new();
    let mut receipt: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::ValidationError(format!("Malformed form data: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "payment_method" => {
                payment_method = field.text().await.map_err(|e| {
                    ServiceError::ValidationError(format!("Malformed form field: {}", e))
                })?;
            }
            "receipt" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    continue;
                }
                let bytes = field.bytes().await.map_err(|e| {
                    ServiceError::UploadError(format!("Failed to read receipt: {}", e))
                })?;
                receipt = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, bytes) = receipt.ok_or_else(|| {
        ServiceError::ValidationError("Please upload payment receipt".to_string())
    })?;

    let updated = state
        .services
        .orders
        .submit_payment(&code, &payment_method, &filename, &bytes)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}
