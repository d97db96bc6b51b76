//! Blog, comment and like models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::ownership::Owned;

/// Blog post
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub content_html: String,
    pub topic: String,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub image: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Blog {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

/// Blog joined with its author and counters
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogWithAuthorRow {
    #[sqlx(flatten)]
    pub blog: Blog,
    pub author_username: String,
    pub author_avatar_url: Option<String>,
    pub comment_count: i64,
    pub like_count: i64,
}

impl Owned for BlogWithAuthorRow {
    fn owner_id(&self) -> Uuid {
        self.blog.author_id
    }
}

/// Public author card embedded in blog responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogCounts {
    pub comments: i64,
    pub likes: i64,
}

/// Item of the blog listing
#[derive(Debug, Serialize)]
pub struct BlogListItem {
    #[serde(flatten)]
    pub blog: Blog,
    pub author: AuthorSummary,
    #[serde(rename = "_count")]
    pub count: BlogCounts,
}

impl From<BlogWithAuthorRow> for BlogListItem {
    fn from(row: BlogWithAuthorRow) -> Self {
        Self {
            author: AuthorSummary {
                id: row.blog.author_id,
                username: row.author_username,
                avatar_url: row.author_avatar_url,
            },
            count: BlogCounts {
                comments: row.comment_count,
                likes: row.like_count,
            },
            blog: row.blog,
        }
    }
}

/// Single blog with its comments and likes
#[derive(Debug, Serialize)]
pub struct BlogDetail {
    #[serde(flatten)]
    pub blog: Blog,
    pub author: AuthorSummary,
    pub comments: Vec<CommentResponse>,
    pub likes: Vec<Like>,
}

/// Comment on a blog
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub blog_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Comment joined with the commenter's public fields
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithUserRow {
    #[sqlx(flatten)]
    pub comment: Comment,
    pub user_username: String,
    pub user_avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommenterSummary {
    pub username: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: CommenterSummary,
}

impl From<CommentWithUserRow> for CommentResponse {
    fn from(row: CommentWithUserRow) -> Self {
        Self {
            comment: row.comment,
            user: CommenterSummary {
                username: row.user_username,
                avatar_url: row.user_avatar_url,
            },
        }
    }
}

/// Like on a blog; one per (blog, user)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// `tags` accepts "a, b" or ["a", "b"]
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    Csv(String),
    List(Vec<String>),
}

impl TagsInput {
    pub fn normalize(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            TagsInput::Csv(s) => s.split(',').map(str::to_string).collect(),
            TagsInput::List(list) => list,
        };
        raw.iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// `isPublic` accepts true/false or the strings "true"/"false"
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlagInput {
    Bool(bool),
    Text(String),
}

impl FlagInput {
    pub fn is_true(&self) -> bool {
        match self {
            FlagInput::Bool(b) => *b,
            FlagInput::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        }
    }
}

/// Create blog request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub content: Option<String>,
    #[validate(length(min = 1, message = "Topic is required"))]
    pub topic: String,
    pub tags: Option<TagsInput>,
    pub is_public: Option<FlagInput>,
    pub image: Option<String>,
}

/// Update blog request; empty or absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub topic: Option<String>,
    pub tags: Option<TagsInput>,
    pub is_public: Option<FlagInput>,
    pub image: Option<String>,
}

/// Normalized insert payload
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub topic: String,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub image: String,
    pub author_id: Uuid,
}

impl NewBlog {
    pub fn from_request(req: CreateBlogRequest, author_id: Uuid) -> Self {
        Self {
            title: req.title,
            content: req.content.unwrap_or_default(),
            topic: req.topic,
            tags: req.tags.map(TagsInput::normalize).unwrap_or_default(),
            is_public: req.is_public.map(|f| f.is_true()).unwrap_or(false),
            image: req.image.unwrap_or_default(),
            author_id,
        }
    }
}

/// Normalized partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub topic: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub image: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<UpdateBlogRequest> for BlogPatch {
    fn from(req: UpdateBlogRequest) -> Self {
        Self {
            title: non_empty(req.title),
            content: non_empty(req.content),
            topic: non_empty(req.topic),
            tags: req.tags.map(TagsInput::normalize),
            is_public: req.is_public.map(|f| f.is_true()),
            image: non_empty(req.image),
        }
    }
}

/// Comment request
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: String,
}

/// Listing filter
#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub topic: Option<String>,
}
