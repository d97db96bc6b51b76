//! Business logic services layer

pub mod auth_service;
pub mod blog_service;
pub mod message_service;

pub use auth_service::AuthService;
pub use blog_service::BlogService;
pub use message_service::MessageService;
