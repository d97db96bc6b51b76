//! Blog repository: posts, likes and comments

use crate::{error::AppError, models::blog::*};
use sqlx::PgPool;
use uuid::Uuid;

/// Shared projection: blog columns, author card and counters
const BLOG_WITH_AUTHOR: &str = r#"
    SELECT
        b.*,
        u.username AS author_username,
        u.avatar_url AS author_avatar_url,
        (SELECT COUNT(*) FROM comments c WHERE c.blog_id = b.id) AS comment_count,
        (SELECT COUNT(*) FROM likes l WHERE l.blog_id = b.id) AS like_count
    FROM blogs b
    JOIN users u ON u.id = b.author_id
"#;

pub struct BlogRepository {
    db: PgPool,
}

impl BlogRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出博客，按创建时间倒序
    ///
    /// `include_private` 为 false 时只返回公开博客；`viewer` 额外放行其本人的私有博客。
    pub async fn list(
        &self,
        topic: Option<&str>,
        include_private: bool,
        viewer: Option<Uuid>,
    ) -> Result<Vec<BlogWithAuthorRow>, AppError> {
        let sql = format!(
            r#"{BLOG_WITH_AUTHOR}
            WHERE ($1::text IS NULL OR b.topic = $1)
              AND ($2 OR b.is_public OR b.author_id = $3)
            ORDER BY b.created_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, BlogWithAuthorRow>(&sql)
            .bind(topic)
            .bind(include_private)
            .bind(viewer)
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    /// 根据 ID 查找博客（含作者与计数）
    pub async fn find_with_author(&self, id: Uuid) -> Result<Option<BlogWithAuthorRow>, AppError> {
        let sql = format!("{BLOG_WITH_AUTHOR} WHERE b.id = $1");

        let row = sqlx::query_as::<_, BlogWithAuthorRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    /// 根据 ID 查找博客
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, AppError> {
        let blog = sqlx::query_as::<_, Blog>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(blog)
    }

    /// 博客是否存在
    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM blogs WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await?;

        Ok(exists)
    }

    /// 创建博客，content_html 与 content 保持一致
    pub async fn create(&self, blog: &NewBlog) -> Result<Blog, AppError> {
        let created = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (title, content, content_html, topic, tags, is_public, image, author_id)
            VALUES ($1, $2, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(&blog.topic)
        .bind(&blog.tags)
        .bind(blog.is_public)
        .bind(&blog.image)
        .bind(blog.author_id)
        .fetch_one(&self.db)
        .await?;

        Ok(created)
    }

    /// 部分更新博客
    pub async fn update(&self, id: Uuid, patch: &BlogPatch) -> Result<Option<Blog>, AppError> {
        let updated = sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs
            SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                content_html = COALESCE($3, content_html),
                topic = COALESCE($4, topic),
                tags = COALESCE($5, tags),
                is_public = COALESCE($6, is_public),
                image = COALESCE($7, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(&patch.topic)
        .bind(&patch.tags)
        .bind(patch.is_public)
        .bind(&patch.image)
        .fetch_optional(&self.db)
        .await?;

        Ok(updated)
    }

    /// 删除博客（点赞与评论级联删除）
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 点赞；同一用户重复点赞返回 Conflict
    pub async fn add_like(&self, blog_id: Uuid, user_id: Uuid) -> Result<Like, AppError> {
        sqlx::query_as::<_, Like>(
            r#"
            INSERT INTO likes (blog_id, user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(blog_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::on_unique_violation(e, "Already liked"))
    }

    /// 博客的全部点赞
    pub async fn list_likes(&self, blog_id: Uuid) -> Result<Vec<Like>, AppError> {
        let likes = sqlx::query_as::<_, Like>(
            "SELECT * FROM likes WHERE blog_id = $1 ORDER BY created_at ASC",
        )
        .bind(blog_id)
        .fetch_all(&self.db)
        .await?;

        Ok(likes)
    }

    /// 发表评论
    pub async fn add_comment(
        &self,
        blog_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<CommentWithUserRow, AppError> {
        let comment = sqlx::query_as::<_, CommentWithUserRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (content, blog_id, user_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT i.*, u.username AS user_username, u.avatar_url AS user_avatar_url
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(content)
        .bind(blog_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(comment)
    }

    /// 博客的全部评论（含评论者信息），按时间倒序
    pub async fn list_comments(&self, blog_id: Uuid) -> Result<Vec<CommentWithUserRow>, AppError> {
        let rows = sqlx::query_as::<_, CommentWithUserRow>(
            r#"
            SELECT c.*, u.username AS user_username, u.avatar_url AS user_avatar_url
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.blog_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(blog_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// 查找属于指定博客的评论
    pub async fn find_comment(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE id = $1 AND blog_id = $2",
        )
        .bind(comment_id)
        .bind(blog_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(comment)
    }

    /// 删除评论
    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
