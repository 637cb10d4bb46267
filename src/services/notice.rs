use crate::{
    error::{AppError, AppResult},
    models::{notice, Notice, NoticeModel, NoticeType},
    response::Pagination,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct NoticeDraft {
    pub title: String,
    pub content: String,
    pub notice_type: NoticeType,
    pub is_pinned: bool,
    pub start_date: Option<chrono::NaiveDateTime>,
    pub end_date: Option<chrono::NaiveDateTime>,
}

/// Admin patch. The date fields are tri-state: `None` leaves the stored
/// value, `Some(None)` clears it, `Some(Some(dt))` sets it.
#[derive(Default)]
pub struct NoticePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub notice_type: Option<NoticeType>,
    pub is_pinned: Option<bool>,
    pub is_published: Option<bool>,
    pub start_date: Option<Option<chrono::NaiveDateTime>>,
    pub end_date: Option<Option<chrono::NaiveDateTime>>,
}

pub struct NoticeService {
    db: DatabaseConnection,
}

impl NoticeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Public listing: published notices only, pinned first, newest first.
    pub async fn list(
        &self,
        type_filter: Option<NoticeType>,
        pagination: Pagination,
    ) -> AppResult<(Vec<NoticeModel>, u64)> {
        let mut query = Notice::find().filter(notice::Column::IsPublished.eq(true));

        if let Some(notice_type) = type_filter {
            query = query.filter(notice::Column::NoticeType.eq(notice_type));
        }

        let paginator = query
            .order_by_desc(notice::Column::IsPinned)
            .order_by_desc(notice::Column::CreatedAt)
            .paginate(&self.db, pagination.take());

        let total = paginator.num_items().await?;
        let notices = paginator.fetch_page(pagination.page - 1).await?;

        Ok((notices, total))
    }

    /// Raw lookup. Publication gating lives in the handler, which knows the
    /// caller's role.
    pub async fn get(&self, id: i32) -> AppResult<NoticeModel> {
        Notice::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("공지사항을 찾을 수 없습니다.".to_string()))
    }

    pub async fn create(&self, draft: NoticeDraft) -> AppResult<NoticeModel> {
        let now = chrono::Utc::now().naive_utc();

        let created = notice::ActiveModel {
            title: Set(draft.title),
            content: Set(draft.content),
            notice_type: Set(draft.notice_type),
            is_pinned: Set(draft.is_pinned),
            is_published: Set(true),
            start_date: Set(draft.start_date),
            end_date: Set(draft.end_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(created)
    }

    pub async fn update(&self, id: i32, patch: NoticePatch) -> AppResult<NoticeModel> {
        let existing = Notice::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("공지사항을 찾을 수 없습니다.".to_string()))?;

        let mut active: notice::ActiveModel = existing.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(notice_type) = patch.notice_type {
            active.notice_type = Set(notice_type);
        }
        if let Some(is_pinned) = patch.is_pinned {
            active.is_pinned = Set(is_pinned);
        }
        if let Some(is_published) = patch.is_published {
            active.is_published = Set(is_published);
        }
        if let Some(start_date) = patch.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = patch.end_date {
            active.end_date = Set(end_date);
        }
        active.updated_at = Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Notice::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("공지사항을 찾을 수 없습니다.".to_string()))?;

        Notice::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
