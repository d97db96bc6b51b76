//! 博客相关的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{auth::MessageResponse, blog::*},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// 博客列表
pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
    viewer: Option<AuthContext>,
    Query(query): Query<BlogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let blogs = state.blog_service.list(viewer.as_ref(), &query).await?;

    Ok(Json(blogs))
}

/// 博客详情
pub async fn get_blog(
    State(state): State<Arc<AppState>>,
    viewer: Option<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let blog = state.blog_service.get(viewer.as_ref(), id).await?;

    Ok(Json(blog))
}

/// 创建博客
pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    let blog = state.blog_service.create(&auth_context, req).await?;

    Ok((StatusCode::CREATED, Json(blog)))
}

/// 更新博客
pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    let blog = state.blog_service.update(&auth_context, id, req).await?;

    Ok(Json(blog))
}

/// 删除博客
pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.blog_service.delete(&auth_context, id).await?;

    Ok(Json(MessageResponse::new("Blog deleted successfully")))
}

/// 点赞
pub async fn like_blog(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let like = state.blog_service.like(&auth_context, id).await?;

    Ok((StatusCode::CREATED, Json(like)))
}

/// 评论
pub async fn comment_blog(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state.blog_service.comment(&auth_context, id, req).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// 删除评论
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path((id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    state
        .blog_service
        .delete_comment(&auth_context, id, comment_id)
        .await?;

    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}
