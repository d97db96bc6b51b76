//! Contact message repository

use crate::{error::AppError, models::message::*};
use sqlx::PgPool;
use uuid::Uuid;

pub struct MessageRepository {
    db: PgPool,
}

impl MessageRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: &CreateMessageRequest) -> Result<Message, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(req.name.trim())
        .bind(req.email.trim())
        .bind(&req.message)
        .fetch_one(&self.db)
        .await?;

        Ok(message)
    }

    /// 按时间倒序列出留言
    pub async fn list(&self) -> Result<Vec<Message>, AppError> {
        let messages =
            sqlx::query_as::<_, Message>("SELECT * FROM messages ORDER BY created_at DESC")
                .fetch_all(&self.db)
                .await?;

        Ok(messages)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
