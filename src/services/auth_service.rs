//! 认证服务：注册、登录、个人资料

use crate::{
    auth::{
        jwt::{SharedTokenCodec, SESSION_TTL_SECS},
        middleware::AuthContext,
        password::PasswordHasher,
    },
    config::AppConfig,
    error::AppError,
    models::{auth::*, user::*},
    repository::user_repo::{ProfileChanges, UserRepository},
};
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    db: PgPool,
    codec: SharedTokenCodec,
    hasher: PasswordHasher,
    config: Arc<AppConfig>,
}

/// Successful login: response body plus the token for the session cookie
pub struct LoginOutcome {
    pub token: String,
    pub response: LoginResponse,
}

impl AuthService {
    pub fn new(
        db: PgPool,
        codec: SharedTokenCodec,
        hasher: PasswordHasher,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            codec,
            hasher,
            config,
        }
    }

    /// 用户注册
    pub async fn register(&self, req: RegisterRequest) -> Result<UserResponse, AppError> {
        req.validate()?;
        self.hasher.validate_password_policy(&req.password)?;

        let user_repo = UserRepository::new(self.db.clone());
        if user_repo
            .exists_by_username_or_email(&req.username, &req.email)
            .await?
        {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash_blocking(req.password.clone()).await?;
        let role = Role::for_registration(&req.email, &self.config.security.admin_email);

        let user = user_repo.create(&req, &password_hash, role).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(UserResponse::from(user))
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<LoginOutcome, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo
            .find_by_email(req.email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User not found!"))?;

        let valid = self
            .hasher
            .verify_blocking(req.password, user.password_hash.clone())
            .await?;
        if !valid {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials("Invalid password!".to_string()));
        }

        let identity = AuthContext {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        };
        let token = self
            .codec
            .issue(&identity, Duration::seconds(SESSION_TTL_SECS))?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            token: token.clone(),
            response: LoginResponse {
                user: UserResponse::from(user),
                token,
            },
        })
    }

    /// 修改个人资料；改密码必须提供当前密码
    pub async fn edit_profile(
        &self,
        identity: &AuthContext,
        req: EditProfileRequest,
    ) -> Result<EditProfileResponse, AppError> {
        let req = req.without_blanks();
        req.validate()?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo
            .find_by_id(identity.id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found!"))?;

        if let Some(username) = req.username.as_deref() {
            if username != user.username
                && user_repo
                    .find_by_username_excluding(username, user.id)
                    .await?
                    .is_some()
            {
                return Err(AppError::conflict("Username already taken"));
            }
        }

        if let Some(email) = req.email.as_deref() {
            if email != user.email
                && user_repo
                    .find_by_email_excluding(email, user.id)
                    .await?
                    .is_some()
            {
                return Err(AppError::conflict("Email already taken"));
            }
        }

        let password_hash = match req.new_password {
            Some(new_password) => {
                let current = req.current_password.ok_or_else(|| {
                    AppError::validation("Current password is required to set a new password")
                })?;

                if !self
                    .hasher
                    .verify_blocking(current, user.password_hash.clone())
                    .await?
                {
                    return Err(AppError::InvalidCredentials(
                        "Current password is incorrect".to_string(),
                    ));
                }

                self.hasher.validate_password_policy(&new_password)?;
                Some(self.hasher.hash_blocking(new_password).await?)
            }
            None => None,
        };

        let changes = ProfileChanges {
            username: req.username,
            email: req.email,
            avatar_url: req.avatar_url,
        };

        let updated = user_repo
            .update_profile(user.id, &changes, password_hash.as_deref())
            .await?
            .ok_or_else(|| AppError::not_found("User not found!"))?;

        if password_hash.is_some() {
            tracing::info!(user_id = %updated.id, "Password changed");
        }
        tracing::info!(user_id = %updated.id, "Profile updated");

        Ok(EditProfileResponse {
            message: "Profile updated successfully".to_string(),
            user: UserResponse::from(updated),
        })
    }
}
