//! 认证相关的 HTTP 处理器

use crate::{
    auth::{carrier, middleware::AuthContext},
    error::AppError,
    middleware::AppState,
    models::{auth::*, user::*},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// 登录：会话令牌同时写入 Cookie 和响应体
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.auth_service.login(req).await?;
    let cookie = carrier::session_cookie(&outcome.token)?;

    Ok(([(header::SET_COOKIE, cookie)], Json(outcome.response)))
}

/// 登出：仅清除 Cookie，已签发的令牌在过期前仍然有效
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, carrier::clear_session_cookie())],
        Json(MessageResponse::new("Logout successful!")),
    )
}

/// 当前用户身份
pub async fn me(auth_context: AuthContext) -> Json<AuthContext> {
    Json(auth_context)
}

/// 修改个人资料
pub async fn edit_profile(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<EditProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.edit_profile(&auth_context, req).await?;

    Ok(Json(response))
}
