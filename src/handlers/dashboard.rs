use crate::services::orders::DashboardSummary;
use crate::services::reports::ReservationReport;
use crate::{ApiResponse, ApiResult, AppState};
use axum::{extract::State, response::Json};

pub async fn summary(State(state): State<AppState>) -> ApiResult<DashboardSummary> {
    let summary = state.services.orders.dashboard().await?;
    Ok(Json(ApiResponse::success(summary)))
}

pub async fn reservation_report(State(state): State<AppState>) -> ApiResult<ReservationReport> {
    let report = state.services.reports.reservation_report().await?;
    Ok(Json(ApiResponse::success(report)))
}
