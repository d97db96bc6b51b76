//! JWT 认证中间件
//! 两段式访问控制：先认证（require_auth），再按路由要求的角色放行（require_role）

use crate::{
    auth::{
        carrier::extract_token,
        jwt::{Claims, SharedTokenCodec, VerificationError},
    },
    error::AppError,
    models::user::Role,
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::convert::Infallible;
use uuid::Uuid;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl TryFrom<Claims> for AuthContext {
    type Error = VerificationError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.id).map_err(|_| VerificationError::Malformed)?;
        Ok(Self {
            id,
            email: claims.email,
            role: claims.role,
        })
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

// 公开路由使用 Option<AuthContext>：匿名请求得到 None
impl<S> OptionalFromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthContext>().cloned())
    }
}

/// 认证：解析并校验令牌，成功后把身份挂到请求上
pub fn authenticate(codec: &SharedTokenCodec, req: &Request) -> Result<AuthContext, AppError> {
    let token = extract_token(req.headers()).ok_or(AppError::Unauthenticated)?;
    let claims = codec.verify(&token)?;
    Ok(AuthContext::try_from(claims)?)
}

/// 第一阶段：必须认证
pub async fn require_auth(
    State(codec): State<SharedTokenCodec>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = match authenticate(&codec, &req) {
        Ok(auth_context) => auth_context,
        Err(e) => {
            let reason = match e {
                AppError::Unauthenticated => "missing",
                _ => "invalid",
            };
            metrics::counter!("auth_gate_rejections_total", "reason" => reason).increment(1);
            return Err(e);
        }
    };

    tracing::debug!(user_id = %auth_context.id, role = %auth_context.role, "Request authenticated");

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// 第二阶段：角色要求，必须叠加在 require_auth 之内
pub async fn require_role(
    State(required): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = req
        .extensions()
        .get::<AuthContext>()
        .ok_or(AppError::Unauthenticated)?;

    if auth_context.role != required {
        tracing::warn!(
            user_id = %auth_context.id,
            role = %auth_context.role,
            required = %required,
            "Role requirement not met"
        );
        metrics::counter!("auth_gate_rejections_total", "reason" => "role").increment(1);
        return Err(AppError::forbidden("Access denied"));
    }

    Ok(next.run(req).await)
}

/// 可选认证 - 不强制要求令牌，无效令牌按匿名处理
pub async fn optional_auth(
    State(codec): State<SharedTokenCodec>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(&codec, &req) {
        Ok(auth_context) => {
            req.extensions_mut().insert(auth_context);
        }
        Err(AppError::Unauthenticated) => {}
        Err(e) => tracing::debug!(error = %e, "Ignoring unusable token on public route"),
    }

    next.run(req).await
}
