//! HTTP 处理器模块

pub mod auth;
pub mod blog;
pub mod health;
pub mod message;
