//! 数据模型模块
//! 用户与认证、博客（含点赞、评论）、留言

pub mod auth;
pub mod blog;
pub mod message;
pub mod user;
