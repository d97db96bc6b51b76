//! 访问控制集成测试（无需数据库）

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use chrono::Duration;
use folio_api::{
    auth::{
        jwt::{JwtService, SharedTokenCodec, TokenCodec},
        middleware::{optional_auth, require_auth, require_role, AuthContext},
    },
    models::user::Role,
    routes::create_router,
};
use std::sync::Arc;
use tower::ServiceExt;

mod common;
use common::{create_lazy_app_state, issue_token, issue_token_with_ttl, read_json, TEST_SECRET};

fn codec() -> SharedTokenCodec {
    Arc::new(JwtService::new(TEST_SECRET).unwrap())
}

async fn whoami(auth_context: AuthContext) -> Json<AuthContext> {
    Json(auth_context)
}

async fn maybe_whoami(viewer: Option<AuthContext>) -> String {
    viewer.map_or_else(|| "anonymous".to_string(), |v| v.role.to_string())
}

/// 与应用路由相同的分层方式，处理器不访问数据库
fn gated_app() -> Router {
    let codec = codec();

    let user_routes = Router::new()
        .route("/private", get(whoami))
        .route_layer(from_fn_with_state(codec.clone(), require_auth));

    let admin_routes = Router::new()
        .route("/admin", get(whoami))
        .route_layer(from_fn_with_state(Role::Admin, require_role))
        .route_layer(from_fn_with_state(codec.clone(), require_auth));

    let optional_routes = Router::new()
        .route("/public", get(maybe_whoami))
        .route_layer(from_fn_with_state(codec, optional_auth));

    Router::new()
        .merge(user_routes)
        .merge(admin_routes)
        .merge(optional_routes)
}

fn get_with(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let response = gated_app().oneshot(get_with("/admin", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["message"], "Not Authenticated!");
    assert!(json["requestId"].is_string());
}

#[tokio::test]
async fn test_invalid_token_is_403() {
    let response = gated_app()
        .oneshot(get_with("/private", Some("Bearer not.a.token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(response).await["message"], "Token is not Valid!");
}

#[tokio::test]
async fn test_expired_token_is_403() {
    let (_, token) = issue_token_with_ttl(Role::Admin, Duration::seconds(-5));

    let response = gated_app()
        .oneshot(get_with("/admin", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(response).await["message"], "Token is not Valid!");
}

#[tokio::test]
async fn test_foreign_signature_is_403() {
    let foreign = JwtService::new("another-secret-that-is-also-32-chars-long").unwrap();
    let (identity, _) = issue_token(Role::Admin);
    let token = foreign.issue(&identity, Duration::days(1)).unwrap();

    let response = gated_app()
        .oneshot(get_with("/admin", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_token_on_admin_route_is_403() {
    let (_, token) = issue_token(Role::User);

    let response = gated_app()
        .oneshot(get_with("/admin", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(response).await["message"], "Access denied");
}

#[tokio::test]
async fn test_admin_token_passes_both_stages() {
    let (identity, token) = issue_token(Role::Admin);

    let response = gated_app()
        .oneshot(get_with("/admin", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["id"], identity.id.to_string());
    assert_eq!(json["role"], "ADMIN");
}

#[tokio::test]
async fn test_cookie_takes_precedence_over_header() {
    let (identity, token) = issue_token(Role::User);

    let request = Request::builder()
        .uri("/private")
        .header(header::COOKIE, format!("theme=dark; token={}", token))
        .header(header::AUTHORIZATION, "Bearer garbage")
        .body(Body::empty())
        .unwrap();
    let response = gated_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["id"], identity.id.to_string());

    // 无效 Cookie 优先，不回退到有效的请求头
    let request = Request::builder()
        .uri("/private")
        .header(header::COOKIE, "token=garbage")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = gated_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_anonymous() {
    let (_, token) = issue_token(Role::User);

    let response = gated_app()
        .oneshot(get_with("/private", Some(&format!("Basic {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_optional_auth_never_rejects() {
    let app = gated_app();

    let anonymous = app.clone().oneshot(get_with("/public", None)).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::OK);
    assert_eq!(common::read_text(anonymous).await, "anonymous");

    let invalid = app
        .clone()
        .oneshot(get_with("/public", Some("Bearer garbage")))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::OK);
    assert_eq!(common::read_text(invalid).await, "anonymous");

    let (_, token) = issue_token(Role::Admin);
    let admin = app
        .oneshot(get_with("/public", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();
    assert_eq!(common::read_text(admin).await, "ADMIN");
}

#[tokio::test]
async fn test_application_routes_are_gated_before_database() {
    let app = create_router(create_lazy_app_state());
    let (_, user_token) = issue_token(Role::User);
    let blog_id = uuid::Uuid::new_v4();

    let cases = [
        ("GET", "/api/messages".to_string(), None, StatusCode::UNAUTHORIZED),
        (
            "GET",
            "/api/messages".to_string(),
            Some(user_token.as_str()),
            StatusCode::FORBIDDEN,
        ),
        (
            "PUT",
            format!("/api/blogs/{}", blog_id),
            Some(user_token.as_str()),
            StatusCode::FORBIDDEN,
        ),
        (
            "POST",
            "/api/blogs/create".to_string(),
            Some("garbage"),
            StatusCode::FORBIDDEN,
        ),
        (
            "POST",
            format!("/api/blogs/{}/like", blog_id),
            None,
            StatusCode::UNAUTHORIZED,
        ),
        (
            "DELETE",
            format!("/api/blogs/{}/comment/{}", blog_id, uuid::Uuid::new_v4()),
            None,
            StatusCode::UNAUTHORIZED,
        ),
        ("PUT", "/api/auth/edit".to_string(), None, StatusCode::UNAUTHORIZED),
    ];

    for (method, uri, token, expected) in cases {
        let mut builder = Request::builder().method(method).uri(&uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), expected, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_me_returns_attached_identity() {
    let app = create_router(create_lazy_app_state());
    let (identity, token) = issue_token(Role::User);

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["id"], identity.id.to_string());
    assert_eq!(json["email"], identity.email);
    assert_eq!(json["role"], "USER");
}

#[tokio::test]
async fn test_logout_clears_cookie_but_token_still_verifies() {
    let app = create_router(create_lazy_app_state());
    let (identity, token) = issue_token(Role::User);

    let logout = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(logout).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert_eq!(read_json(response).await["message"], "Logout successful!");

    // 无服务端吊销：截获的令牌在过期前通过请求头重放仍然有效
    let replay = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(replay).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["id"], identity.id.to_string());
}
