use crate::auth::AdminIdentity;
use crate::{errors::ServiceError, ApiResponse, ApiResult, AppState};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    request.validate()?;
    let token = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        username: request.username,
    })))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<()> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.services.auth.logout(token);
    }
    Ok(Json(ApiResponse::success(())))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    if request.new_password != request.confirm_password {
        return Err(ServiceError::ValidationError(
            "New passwords do not match".to_string(),
        ));
    }
    state
        .services
        .auth
        .change_password(
            &admin.username,
            &request.current_password,
            &request.new_password,
        )
        .await?;
    Ok(Json(ApiResponse::success(())))
}
