//! 留言服务

use crate::{error::AppError, models::message::*, repository::message_repo::MessageRepository};
use sqlx::PgPool;
use uuid::Uuid;

pub struct MessageService {
    db: PgPool,
}

impl MessageService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateMessageRequest) -> Result<Message, AppError> {
        req.check()?;

        let message = MessageRepository::new(self.db.clone()).create(&req).await?;

        tracing::info!(message_id = %message.id, "Contact message received");

        Ok(message)
    }

    pub async fn list(&self) -> Result<Vec<Message>, AppError> {
        MessageRepository::new(self.db.clone()).list().await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !MessageRepository::new(self.db.clone()).delete(id).await? {
            return Err(AppError::not_found("Message not found"));
        }

        Ok(())
    }
}
