//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use crate::{
    auth::middleware::{optional_auth, require_auth, require_role},
    handlers,
    middleware::AppState,
    models::user::Role,
};

/// 请求体上限（博客正文可能较长）
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// 创建应用路由
///
/// 访问控制按路由组声明：`route_layer` 后添加的先执行，
/// 因此管理员路由先叠加 require_role，再叠加 require_auth。
pub fn create_router(state: Arc<AppState>) -> Router {
    let codec = state.codec.clone();

    // 公开端点
    let public_routes = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/messages", post(handlers::message::create_message));

    // 可选认证：匿名可读，登录后可见自己的私有博客
    let optional_routes = Router::new()
        .route("/api/blogs", get(handlers::blog::list_blogs))
        .route("/api/blogs/{id}", get(handlers::blog::get_blog))
        .route_layer(from_fn_with_state(codec.clone(), optional_auth));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/edit", put(handlers::auth::edit_profile))
        .route("/api/blogs/{id}/like", post(handlers::blog::like_blog))
        .route("/api/blogs/{id}/comment", post(handlers::blog::comment_blog))
        .route(
            "/api/blogs/{id}/comment/{comment_id}",
            delete(handlers::blog::delete_comment),
        )
        .route_layer(from_fn_with_state(codec.clone(), require_auth));

    // 管理员路由
    let admin_routes = Router::new()
        .route("/api/blogs/create", post(handlers::blog::create_blog))
        .route(
            "/api/blogs/{id}",
            put(handlers::blog::update_blog).delete(handlers::blog::delete_blog),
        )
        .route("/api/messages", get(handlers::message::list_messages))
        .route(
            "/api/messages/{id}",
            delete(handlers::message::delete_message),
        )
        .route_layer(from_fn_with_state(Role::Admin, require_role))
        .route_layer(from_fn_with_state(codec, require_auth));

    Router::new()
        .merge(public_routes)
        .merge(optional_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .layer(cors_layer(&state.config.server.cors_origin))
        .with_state(state)
}

/// 单一来源、允许携带 Cookie 的 CORS 配置
fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(e) => {
            tracing::warn!(origin = %origin, error = %e, "Invalid CORS origin, cross-origin requests disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
