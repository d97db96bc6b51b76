//! Contact message models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::AppError;

/// Message left through the contact form
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Body returned after a contact message is stored
#[derive(Debug, Serialize)]
pub struct MessageSentResponse {
    pub message: String,
    pub data: Message,
}

impl MessageSentResponse {
    pub fn new(data: Message) -> Self {
        Self {
            message: "Message sent successfully".to_string(),
            data,
        }
    }
}

/// Contact form submission; missing fields deserialize as empty
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl CreateMessageRequest {
    /// 必填校验先于邮箱格式校验
    pub fn check(&self) -> Result<(), AppError> {
        let blank = |s: &str| s.trim().is_empty();
        if blank(&self.name) || blank(&self.email) || blank(&self.message) {
            return Err(AppError::validation("All fields are required."));
        }

        if !self.email.trim().to_string().validate_email() {
            return Err(AppError::validation("Please enter a valid email address."));
        }

        Ok(())
    }
}
