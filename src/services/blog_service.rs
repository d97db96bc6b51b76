//! 博客服务：文章、点赞、评论

use crate::{
    auth::{
        middleware::AuthContext,
        ownership::{can_manage, ensure_can_manage},
    },
    error::AppError,
    models::blog::*,
    repository::blog_repo::BlogRepository,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct BlogService {
    db: PgPool,
}

impl BlogService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn repo(&self) -> BlogRepository {
        BlogRepository::new(self.db.clone())
    }

    /// 博客列表：管理员可见全部，其他人只看公开博客和自己的博客
    pub async fn list(
        &self,
        viewer: Option<&AuthContext>,
        query: &BlogQuery,
    ) -> Result<Vec<BlogListItem>, AppError> {
        let include_private = viewer.map(AuthContext::is_admin).unwrap_or(false);
        let topic = query.topic.as_deref().filter(|t| !t.is_empty());

        let rows = self
            .repo()
            .list(topic, include_private, viewer.map(|v| v.id))
            .await?;

        Ok(rows.into_iter().map(BlogListItem::from).collect())
    }

    /// 博客详情；私有博客仅作者与管理员可见
    pub async fn get(&self, viewer: Option<&AuthContext>, id: Uuid) -> Result<BlogDetail, AppError> {
        let repo = self.repo();
        let row = repo
            .find_with_author(id)
            .await?
            .ok_or_else(|| AppError::not_found("Blog not found"))?;

        if !row.blog.is_public && !viewer.map(|v| can_manage(v, &row)).unwrap_or(false) {
            return Err(AppError::forbidden("Unauthorized access"));
        }

        let comments = repo.list_comments(id).await?;
        let likes = repo.list_likes(id).await?;
        let item = BlogListItem::from(row);

        Ok(BlogDetail {
            blog: item.blog,
            author: item.author,
            comments: comments.into_iter().map(CommentResponse::from).collect(),
            likes,
        })
    }

    /// 创建博客，作者为当前用户
    pub async fn create(&self, identity: &AuthContext, req: CreateBlogRequest) -> Result<Blog, AppError> {
        req.validate()?;

        let blog = self
            .repo()
            .create(&NewBlog::from_request(req, identity.id))
            .await?;

        tracing::info!(blog_id = %blog.id, author_id = %identity.id, "Blog created");

        Ok(blog)
    }

    /// 更新博客（作者或管理员）
    pub async fn update(
        &self,
        identity: &AuthContext,
        id: Uuid,
        req: UpdateBlogRequest,
    ) -> Result<Blog, AppError> {
        let repo = self.repo();
        let blog = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Blog not found"))?;

        ensure_can_manage(identity, &blog, "Unauthorized")?;

        let updated = repo
            .update(id, &BlogPatch::from(req))
            .await?
            .ok_or_else(|| AppError::not_found("Blog not found"))?;

        tracing::info!(blog_id = %id, user_id = %identity.id, "Blog updated");

        Ok(updated)
    }

    /// 删除博客（作者或管理员）
    pub async fn delete(&self, identity: &AuthContext, id: Uuid) -> Result<(), AppError> {
        let repo = self.repo();
        let blog = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Blog not found"))?;

        ensure_can_manage(identity, &blog, "Unauthorized")?;

        if !repo.delete(id).await? {
            return Err(AppError::not_found("Blog not found"));
        }

        tracing::info!(blog_id = %id, user_id = %identity.id, "Blog deleted");

        Ok(())
    }

    /// 点赞
    pub async fn like(&self, identity: &AuthContext, blog_id: Uuid) -> Result<Like, AppError> {
        let repo = self.repo();
        if !repo.exists(blog_id).await? {
            return Err(AppError::not_found("Blog not found"));
        }

        repo.add_like(blog_id, identity.id).await
    }

    /// 发表评论
    pub async fn comment(
        &self,
        identity: &AuthContext,
        blog_id: Uuid,
        req: CreateCommentRequest,
    ) -> Result<CommentResponse, AppError> {
        let content = req.content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest("Comment cannot be empty".to_string()));
        }

        let repo = self.repo();
        if !repo.exists(blog_id).await? {
            return Err(AppError::not_found("Blog not found"));
        }

        let row = repo.add_comment(blog_id, identity.id, content).await?;

        Ok(CommentResponse::from(row))
    }

    /// 删除评论（评论者或管理员）
    pub async fn delete_comment(
        &self,
        identity: &AuthContext,
        blog_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), AppError> {
        let repo = self.repo();
        let comment = repo
            .find_comment(blog_id, comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))?;

        ensure_can_manage(identity, &comment, "Unauthorized")?;

        if !repo.delete_comment(comment.id).await? {
            return Err(AppError::not_found("Comment not found"));
        }

        tracing::info!(comment_id = %comment_id, user_id = %identity.id, "Comment deleted");

        Ok(())
    }
}
