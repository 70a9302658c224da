use crate::entities::product;
use crate::services::catalog::{ProductInput, RankedProduct};
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Public storefront listing, best sellers first.
pub async fn list_ranked(State(state): State<AppState>) -> ApiResult<Vec<RankedProduct>> {
    let products = state.services.catalog.list_ranked().await?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<product::Model>> {
    let products = state.services.catalog.list().await?;
    Ok(Json(ApiResponse::success(products)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<product::Model> {
    let product = state.services.catalog.get(id).await?;
    Ok(Json(ApiResponse::success(product)))
}

#[derive(Default)]
struct ProductForm {
    name: Option<String>,
    price: Option<Decimal>,
    weight: Option<f64>,
    image: Option<(String, Vec<u8>)>,
    remove_image: bool,
}

async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm, ServiceError> {
    let mut form = ProductForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::ValidationError(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => form.name = Some(read_text(field).await?),
            "price" => {
                let raw = read_text(field).await?;
                form.price = Some(Decimal::from_str(raw.trim()).map_err(|_| {
                    ServiceError::ValidationError("Price must be a number".to_string())
                })?);
            }
            "weight" => {
                let raw = read_text(field).await?;
                form.weight = Some(raw.trim().parse().map_err(|_| {
                    ServiceError::ValidationError("Weight must be a number".to_string())
                })?);
            }
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    continue;
                }
                let bytes = field.bytes().await.map_err(|e| {
                    ServiceError::UploadError(format!("Failed to read image: {}", e))
                })?;
                form.image = Some((filename, bytes.to_vec()));
            }
            "remove_image" => {
                let raw = read_text(field).await?;
                form.remove_image = matches!(raw.as_str(), "on" | "true" | "1");
            }
            _ => {}
        }
    }
    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ServiceError> {
    field
        .text()
        .await
        .map_err(|e| ServiceError::ValidationError(format!("Malformed form field: {}", e)))
}

fn form_input(form: &ProductForm) -> Result<ProductInput, ServiceError> {
    Ok(ProductInput {
        name: form
            .name
            .clone()
            .ok_or_else(|| ServiceError::ValidationError("Product name is required".to_string()))?,
        price: form
            .price
            .ok_or_else(|| ServiceError::ValidationError("Price is required".to_string()))?,
        weight: form
            .weight
            .ok_or_else(|| ServiceError::ValidationError("Weight is required".to_string()))?,
    })
}

pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<product::Model> {
    let form = read_product_form(multipart).await?;
    let input = form_input(&form)?;

    let image_url = match &form.image {
        Some((filename, bytes)) => Some(
            state
                .services
                .uploads
                .store_product_image(filename, bytes)
                .await?,
        ),
        None => None,
    };

    let created = state.services.catalog.create(input, image_url).await?;
    Ok(Json(ApiResponse::success(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> ApiResult<product::Model> {
    let form = read_product_form(multipart).await?;
    let input = form_input(&form)?;

    let new_image = match &form.image {
        Some((filename, bytes)) => Some(
            state
                .services
                .uploads
                .store_product_image(filename, bytes)
                .await?,
        ),
        None => None,
    };

    let updated = state
        .services
        .catalog
        .update(id, input, new_image, form.remove_image)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<()> {
    state.services.catalog.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}
