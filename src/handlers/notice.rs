use crate::{
    error::{AppError, AppResult},
    middleware::{auth::is_admin_identity, require_admin, AuthUser, Identity},
    models::{NoticeModel, NoticeType},
    response::Pagination,
    services::notice::{NoticeDraft, NoticePatch, NoticeService},
    utils::format_utc,
};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

const NOTICES_PER_PAGE: u64 = 10;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub notice_type: NoticeType,
    pub is_pinned: bool,
    pub is_published: bool,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<NoticeModel> for NoticeResponse {
    fn from(n: NoticeModel) -> Self {
        Self {
            id: n.id,
            title: n.title,
            content: n.content,
            notice_type: n.notice_type,
            is_pinned: n.is_pinned,
            is_published: n.is_published,
            start_date: n.start_date.map(format_utc),
            end_date: n.end_date.map(format_utc),
            created_at: format_utc(n.created_at),
            updated_at: format_utc(n.updated_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeListResponse {
    pub notices: Vec<NoticeResponse>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

/// Mutation responses wrap the notice, matching the frontend contract.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeEnvelope {
    pub notice: NoticeResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NoticeListQuery {
    /// Notice type filter; unknown values are ignored
    #[serde(rename = "type")]
    pub notice_type: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoticeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub notice_type: Option<NoticeType>,
    pub is_pinned: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Patch body. The date fields distinguish "omitted" from an explicit
/// `null`: omitted leaves the stored value, `null` clears it.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoticeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub notice_type: Option<NoticeType>,
    pub is_pinned: Option<bool>,
    pub is_published: Option<bool>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub end_date: Option<Option<DateTime<Utc>>>,
}

#[utoipa::path(
    get,
    path = "/api/notices",
    params(
        ("type" = Option<String>, Query, description = "NOTICE, EVENT, UPDATE or MAINTENANCE"),
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("limit" = Option<u64>, Query, description = "Items per page, capped at 100"),
    ),
    responses(
        (status = 200, description = "Published notices, pinned first", body = NoticeListResponse),
    ),
    tag = "notices"
)]
pub async fn list_notices(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<NoticeListQuery>,
) -> AppResult<impl IntoResponse> {
    let type_filter = params
        .notice_type
        .as_deref()
        .and_then(NoticeType::parse_filter);
    let pagination = Pagination::new(params.page, params.limit, NOTICES_PER_PAGE);

    let (notices, total) = NoticeService::new(db)
        .list(type_filter, pagination)
        .await
        .map_err(|e: AppError| e.fail_with("공지사항 조회에 실패했습니다."))?;

    Ok(Json(NoticeListResponse {
        notices: notices.into_iter().map(NoticeResponse::from).collect(),
        total,
        page: pagination.page,
        total_pages: pagination.total_pages(total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/notices/{id}",
    params(("id" = i32, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice detail", body = NoticeResponse),
        (status = 404, description = "Notice not found (or unpublished)", body = AppError),
    ),
    tag = "notices"
)]
pub async fn get_notice(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    identity: Identity,
) -> AppResult<impl IntoResponse> {
    let notice = NoticeService::new(db.clone())
        .get(id)
        .await
        .map_err(|e: AppError| e.fail_with("공지사항 조회에 실패했습니다."))?;

    // Unpublished notices answer 404 for everyone below admin, so their
    // existence never leaks.
    if !notice.is_published {
        let admin = is_admin_identity(&db, &identity)
            .await
            .map_err(|e| e.fail_with("공지사항 조회에 실패했습니다."))?;
        if !admin {
            return Err(AppError::NotFound("공지사항을 찾을 수 없습니다.".to_string()));
        }
    }

    Ok(Json(NoticeResponse::from(notice)))
}

#[utoipa::path(
    post,
    path = "/api/notices",
    request_body = CreateNoticeRequest,
    responses(
        (status = 201, description = "Notice created", body = NoticeEnvelope),
        (status = 401, description = "Not logged in", body = AppError),
        (status = 403, description = "Admin role required", body = AppError),
    ),
    tag = "notices"
)]
pub async fn create_notice(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateNoticeRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let title = super::require_trimmed(payload.title.as_deref(), "제목은 필수입니다.")?;
    let content = super::require_trimmed(payload.content.as_deref(), "내용은 필수입니다.")?;

    let draft = NoticeDraft {
        title,
        content,
        notice_type: payload.notice_type.unwrap_or(NoticeType::Notice),
        is_pinned: payload.is_pinned.unwrap_or(false),
        start_date: payload.start_date.map(|d| d.naive_utc()),
        end_date: payload.end_date.map(|d| d.naive_utc()),
    };

    let created = NoticeService::new(db)
        .create(draft)
        .await
        .map_err(|e| e.fail_with("공지사항 작성에 실패했습니다."))?;

    Ok((
        StatusCode::CREATED,
        Json(NoticeEnvelope {
            notice: NoticeResponse::from(created),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/notices/{id}",
    params(("id" = i32, Path, description = "Notice ID")),
    request_body = UpdateNoticeRequest,
    responses(
        (status = 200, description = "Notice updated", body = NoticeEnvelope),
        (status = 403, description = "Admin role required", body = AppError),
        (status = 404, description = "Notice not found", body = AppError),
    ),
    tag = "notices"
)]
pub async fn update_notice(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateNoticeRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let title = payload
        .title
        .map(|t| super::require_trimmed(Some(t.as_str()), "제목은 필수입니다."))
        .transpose()?;
    let content = payload
        .content
        .map(|c| super::require_trimmed(Some(c.as_str()), "내용은 필수입니다."))
        .transpose()?;

    let patch = NoticePatch {
        title,
        content,
        notice_type: payload.notice_type,
        is_pinned: payload.is_pinned,
        is_published: payload.is_published,
        start_date: payload
            .start_date
            .map(|opt| opt.map(|d| d.naive_utc())),
        end_date: payload.end_date.map(|opt| opt.map(|d| d.naive_utc())),
    };

    let updated = NoticeService::new(db)
        .update(id, patch)
        .await
        .map_err(|e| e.fail_with("공지사항 수정에 실패했습니다."))?;

    Ok(Json(NoticeEnvelope {
        notice: NoticeResponse::from(updated),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/notices/{id}",
    params(("id" = i32, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice deleted"),
        (status = 403, description = "Admin role required", body = AppError),
        (status = 404, description = "Notice not found", body = AppError),
    ),
    tag = "notices"
)]
pub async fn delete_notice(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    NoticeService::new(db)
        .delete(id)
        .await
        .map_err(|e| e.fail_with("공지사항 삭제에 실패했습니다."))?;

    Ok(Json(json!({ "success": true })))
}
