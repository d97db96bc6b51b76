//! 留言相关的 HTTP 处理器

use crate::{
    error::AppError,
    middleware::AppState,
    models::{auth::MessageResponse, message::*},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// 提交留言（公开）
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let message = state.message_service.create(req).await?;

    Ok((StatusCode::CREATED, Json(MessageSentResponse::new(message))))
}

/// 留言列表（管理员）
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let messages = state.message_service.list().await?;

    Ok(Json(messages))
}

/// 删除留言（管理员）
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.message_service.delete(id).await?;

    Ok(Json(MessageResponse::new("Message deleted successfully")))
}
