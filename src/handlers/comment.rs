use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    services::comment::{CommentEntry, CommentService, CommentThread},
    utils::format_utc,
};
use axum::{
    extract::Path, http::StatusCode, response::IntoResponse, Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub post_id: i32,
    pub parent_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<CommentAuthor>,
}

impl From<CommentEntry> for CommentResponse {
    fn from(entry: CommentEntry) -> Self {
        let author = entry.author.map(|u| CommentAuthor {
            id: u.id,
            name: u.name,
            image: u.image,
        });
        let c = entry.comment;
        Self {
            id: c.id,
            content: c.content,
            user_id: c.user_id,
            post_id: c.post_id,
            parent_id: c.parent_id,
            created_at: format_utc(c.created_at),
            updated_at: format_utc(c.updated_at),
            author,
        }
    }
}

/// A root comment with its one rendered level of replies.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadResponse {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub post_id: i32,
    pub parent_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<CommentAuthor>,
    pub replies: Vec<CommentResponse>,
}

impl From<CommentThread> for CommentThreadResponse {
    fn from(thread: CommentThread) -> Self {
        let replies = thread.replies.into_iter().map(CommentResponse::from).collect();
        let root = CommentResponse::from(CommentEntry {
            comment: thread.comment,
            author: thread.author,
        });
        Self {
            id: root.id,
            content: root.content,
            user_id: root.user_id,
            post_id: root.post_id,
            parent_id: root.parent_id,
            created_at: root.created_at,
            updated_at: root.updated_at,
            author: root.author,
            replies,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    pub parent_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/comments",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comment threads, oldest first", body = Vec<CommentThreadResponse>),
    ),
    tag = "comments"
)]
pub async fn list_comments(
    Extension(db): Extension<DatabaseConnection>,
    Path(post_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let threads = CommentService::new(db)
        .list_for_post(post_id)
        .await
        .map_err(|e: AppError| e.fail_with("댓글을 불러오는데 실패했습니다."))?;

    let body: Vec<CommentThreadResponse> = threads
        .into_iter()
        .map(CommentThreadResponse::from)
        .collect();
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Missing content", body = AppError),
        (status = 401, description = "Not logged in", body = AppError),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "comments"
)]
pub async fn create_comment(
    Extension(db): Extension<DatabaseConnection>,
    Path(post_id): Path<i32>,
    auth_user: AuthUser,
    Json(payload): Json<CreateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    let content = super::require_trimmed(payload.content.as_deref(), "내용은 필수입니다.")?;

    let entry = CommentService::new(db)
        .create(post_id, auth_user.id, &content, payload.parent_id)
        .await
        .map_err(|e| e.fail_with("댓글 작성에 실패했습니다."))?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(entry))))
}

#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    params(("id" = i32, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "comments"
)]
pub async fn update_comment(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    let content = super::require_trimmed(payload.content.as_deref(), "내용은 필수입니다.")?;

    let entry = CommentService::new(db)
        .update(id, auth_user.id, &content)
        .await
        .map_err(|e| e.fail_with("댓글 수정에 실패했습니다."))?;

    Ok(Json(CommentResponse::from(entry)))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "comments"
)]
pub async fn delete_comment(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    CommentService::new(db)
        .delete(id, auth_user.id)
        .await
        .map_err(|e| e.fail_with("댓글 삭제에 실패했습니다."))?;

    Ok(Json(json!({ "message": "댓글이 삭제되었습니다." })))
}
