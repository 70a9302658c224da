use crate::entities::setting;
use crate::services::settings::StoreSettings;
use crate::{ApiResponse, ApiResult, AppState};
use axum::{extract::State, response::Json};
use std::collections::HashMap;

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<setting::Model>> {
    let rows = state.services.settings.list().await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Bulk update; only recognized keys are accepted.
pub async fn update(
    State(state): State<AppState>,
    Json(updates): Json<HashMap<String, String>>,
) -> ApiResult<StoreSettings> {
    state.services.settings.update(updates).await?;
    let settings = state.services.settings.load().await?;
    Ok(Json(ApiResponse::success(settings)))
}
