use crate::{
    error::{AppError, AppResult},
    models::{comment, user},
    models::{Comment, CommentModel, Post, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use std::collections::HashMap;

pub struct CommentEntry {
    pub comment: CommentModel,
    pub author: Option<UserModel>,
}

/// A root comment with its direct replies. Only one level of nesting is
/// surfaced; a reply to a reply never appears in the thread view.
pub struct CommentThread {
    pub comment: CommentModel,
    pub author: Option<UserModel>,
    pub replies: Vec<CommentEntry>,
}

pub struct CommentService {
    db: DatabaseConnection,
}

impl CommentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Threaded listing for a post: roots oldest first, replies oldest
    /// first within each root. A missing post simply yields an empty list.
    pub async fn list_for_post(&self, post_id: i32) -> AppResult<Vec<CommentThread>> {
        let comments = Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?;

        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<i32> = comments.iter().map(|c| c.user_id).collect();
        let users: HashMap<i32, UserModel> = User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let (roots, replies): (Vec<_>, Vec<_>) =
            comments.into_iter().partition(|c| c.parent_id.is_none());

        let mut grouped: HashMap<i32, Vec<CommentEntry>> = HashMap::new();
        for reply in replies {
            if let Some(parent_id) = reply.parent_id {
                let author = users.get(&reply.user_id).cloned();
                grouped.entry(parent_id).or_default().push(CommentEntry {
                    comment: reply,
                    author,
                });
            }
        }

        Ok(roots
            .into_iter()
            .map(|root| CommentThread {
                author: users.get(&root.user_id).cloned(),
                replies: grouped.remove(&root.id).unwrap_or_default(),
                comment: root,
            })
            .collect())
    }

    /// Create a comment (or a reply, when `parent_id` is given). The parent
    /// must exist and belong to the same post.
    pub async fn create(
        &self,
        post_id: i32,
        user_id: i32,
        content: &str,
        parent_id: Option<i32>,
    ) -> AppResult<CommentEntry> {
        Post::find_by_id(post_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("게시글을 찾을 수 없습니다.".to_string()))?;

        if let Some(parent_id) = parent_id {
            let parent = Comment::find_by_id(parent_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("댓글을 찾을 수 없습니다.".to_string()))?;

            if parent.post_id != post_id {
                return Err(AppError::Validation("잘못된 요청입니다.".to_string()));
            }
        }

        let now = chrono::Utc::now().naive_utc();
        let created = comment::ActiveModel {
            content: Set(content.to_string()),
            user_id: Set(user_id),
            post_id: Set(post_id),
            parent_id: Set(parent_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.with_author(created).await
    }

    pub async fn update(&self, id: i32, user_id: i32, content: &str) -> AppResult<CommentEntry> {
        let existing = Comment::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("댓글을 찾을 수 없습니다.".to_string()))?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden("수정 권한이 없습니다.".to_string()));
        }

        let mut active: comment::ActiveModel = existing.into();
        active.content = Set(content.to_string());
        active.updated_at = Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        self.with_author(updated).await
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> AppResult<()> {
        let existing = Comment::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("댓글을 찾을 수 없습니다.".to_string()))?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden("삭제 권한이 없습니다.".to_string()));
        }

        Comment::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn with_author(&self, comment: CommentModel) -> AppResult<CommentEntry> {
        let author = User::find_by_id(comment.user_id).one(&self.db).await?;
        Ok(CommentEntry { comment, author })
    }
}
