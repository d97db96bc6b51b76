//! Database repository layer

pub mod blog_repo;
pub mod message_repo;
pub mod user_repo;

pub use blog_repo::*;
pub use message_repo::*;
pub use user_repo::*;
