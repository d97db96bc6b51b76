//! User repository (数据库访问层)

use crate::{error::AppError, models::user::*};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct UserRepository {
    db: PgPool,
}

/// Normalized profile changes; `None` keeps the stored value
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 用户名或邮箱是否已被占用
    pub async fn exists_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    /// 查找占用该用户名的其他用户
    pub async fn find_by_username_excluding(
        &self,
        username: &str,
        exclude_id: Uuid,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1 AND id <> $2")
            .bind(username)
            .bind(exclude_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 查找占用该邮箱的其他用户
    pub async fn find_by_email_excluding(
        &self,
        email: &str,
        exclude_id: Uuid,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 AND id <> $2")
            .bind(email)
            .bind(exclude_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 创建用户
    pub async fn create(
        &self,
        req: &RegisterRequest,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, avatar_url, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&req.username)
        .bind(&req.email)
        .bind(password_hash)
        .bind(&req.avatar_url)
        .bind(role)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::on_unique_violation(e, "User already exists"))
    }

    /// 更新个人资料（角色不随邮箱变更重新计算）；带 `password_hash` 时与密码在同一事务内提交
    pub async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin transaction");
            AppError::Database(e)
        })?;

        if let Some(password_hash) = password_hash {
            Self::update_password(&mut *tx, id, password_hash).await?;
        }

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                avatar_url = COALESCE($4, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.avatar_url)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::on_unique_violation(e, "Username or email already taken"))?;

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to commit transaction");
            AppError::Database(e)
        })?;

        Ok(updated)
    }

    /// 更新密码（在调用方的事务内执行）
    pub async fn update_password(
        conn: &mut PgConnection,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                password_hash = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
