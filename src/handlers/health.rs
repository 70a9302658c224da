use crate::{errors::ServiceError, ApiResponse, AppState};
use axum::{extract::State, response::Json};
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> Result<Json<ApiResponse<Value>>, ServiceError> {
    let db_ok = crate::db::check_connection(&state.db).await.is_ok();
    Ok(Json(ApiResponse::success(json!({
        "status": if db_ok { "healthy" } else { "degraded" },
        "database": if db_ok { "up" } else { "down" },
        "version": env!("CARGO_PKG_VERSION"),
    }))))
}
