use crate::{
    error::{AppError, AppResult},
    handlers::comment::CommentThreadResponse,
    middleware::AuthUser,
    models::{CategoryModel, PostModel, UserModel},
    response::Pagination,
    services::post::{ListedPost, PostPatch, PostService, PostWithRefs},
    services::CommentService,
    utils::format_utc,
};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

const POSTS_PER_PAGE: u64 = 20;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    pub id: i32,
    pub name: String,
    pub nickname: Option<String>,
}

impl From<UserModel> for PostAuthor {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            name: u.name,
            nickname: u.nickname,
        }
    }
}

/// Author shape on the detail view, which also shows the avatar.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailAuthor {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<CategoryModel> for CategoryRef {
    fn from(c: CategoryModel) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostListItem {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub view_count: i32,
    pub is_notice: bool,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<PostAuthor>,
    pub category: Option<CategoryRef>,
    pub comment_count: i64,
}

impl From<ListedPost> for PostListItem {
    fn from(listed: ListedPost) -> Self {
        let p = listed.post;
        Self {
            id: p.id,
            title: p.title,
            content: p.content,
            slug: p.slug,
            view_count: p.view_count,
            is_notice: p.is_notice,
            is_published: p.is_published,
            created_at: format_utc(p.created_at),
            updated_at: format_utc(p.updated_at),
            author: listed.author.map(PostAuthor::from),
            category: listed.category.map(CategoryRef::from),
            comment_count: listed.comment_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub posts: Vec<PostListItem>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

/// Create/update responses embed author and category but no comments.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub view_count: i32,
    pub is_notice: bool,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<PostAuthor>,
    pub category: Option<CategoryRef>,
}

impl From<PostWithRefs> for PostResponse {
    fn from(refs: PostWithRefs) -> Self {
        let p = refs.post;
        Self {
            id: p.id,
            title: p.title,
            content: p.content,
            slug: p.slug,
            view_count: p.view_count,
            is_notice: p.is_notice,
            is_published: p.is_published,
            created_at: format_utc(p.created_at),
            updated_at: format_utc(p.updated_at),
            author: refs.author.map(PostAuthor::from),
            category: refs.category.map(CategoryRef::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub view_count: i32,
    pub is_notice: bool,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<PostDetailAuthor>,
    pub category: Option<CategoryRef>,
    pub comments: Vec<CommentThreadResponse>,
}

impl PostDetailResponse {
    fn new(
        post: PostModel,
        author: Option<UserModel>,
        category: Option<CategoryModel>,
        comments: Vec<CommentThreadResponse>,
    ) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            slug: post.slug,
            view_count: post.view_count,
            is_notice: post.is_notice,
            is_published: post.is_published,
            created_at: format_utc(post.created_at),
            updated_at: format_utc(post.updated_at),
            author: author.map(|u| PostDetailAuthor {
                id: u.id,
                name: u.name,
                image: u.image,
            }),
            category: category.map(CategoryRef::from),
            comments,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Category slug filter
    pub category: Option<String>,
    /// Substring search over title and content
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchPostsQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/posts",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("limit" = Option<u64>, Query, description = "Items per page, capped at 100"),
        ("category" = Option<String>, Query, description = "Category slug"),
        ("search" = Option<String>, Query, description = "Substring filter"),
    ),
    responses(
        (status = 200, description = "Paged post list", body = PostListResponse),
    ),
    tag = "posts"
)]
pub async fn list_posts(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<PostListQuery>,
) -> AppResult<impl IntoResponse> {
    let pagination = Pagination::new(params.page, params.limit, POSTS_PER_PAGE);

    let (posts, total) = PostService::new(db)
        .list(params.category.as_deref(), params.search.as_deref(), pagination)
        .await
        .map_err(|e: AppError| e.fail_with("게시글을 불러오는데 실패했습니다."))?;

    Ok(Json(PostListResponse {
        posts: posts.into_iter().map(PostListItem::from).collect(),
        total,
        page: pagination.page,
        total_pages: pagination.total_pages(total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/posts/search",
    params(
        ("q" = String, Query, description = "Search term (required, non-blank)"),
        ("category" = Option<String>, Query, description = "Category slug"),
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("limit" = Option<u64>, Query, description = "Items per page, capped at 100"),
    ),
    responses(
        (status = 200, description = "Search results", body = PostListResponse),
        (status = 400, description = "Blank search term", body = AppError),
    ),
    tag = "posts"
)]
pub async fn search_posts(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<SearchPostsQuery>,
) -> AppResult<impl IntoResponse> {
    let query_text = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => {
            return Err(AppError::Validation("검색어를 입력해주세요.".to_string()));
        }
    };

    let pagination = Pagination::new(params.page, params.limit, POSTS_PER_PAGE);

    let (posts, total) = PostService::new(db)
        .search(&query_text, params.category.as_deref(), pagination)
        .await
        .map_err(|e: AppError| e.fail_with("검색 중 오류가 발생했습니다."))?;

    Ok(Json(PostListResponse {
        posts: posts.into_iter().map(PostListItem::from).collect(),
        total,
        page: pagination.page,
        total_pages: pagination.total_pages(total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post with comment threads", body = PostDetailResponse),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn get_post(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let refs = PostService::new(db.clone())
        .get_detail(id)
        .await
        .map_err(|e: AppError| e.fail_with("게시글을 불러오는데 실패했습니다."))?;

    let comments = CommentService::new(db)
        .list_for_post(refs.post.id)
        .await
        .map_err(|e| e.fail_with("게시글을 불러오는데 실패했습니다."))?
        .into_iter()
        .map(CommentThreadResponse::from)
        .collect();

    Ok(Json(PostDetailResponse::new(
        refs.post,
        refs.author,
        refs.category,
        comments,
    )))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing field", body = AppError),
        (status = 401, description = "Not logged in", body = AppError),
    ),
    tag = "posts"
)]
pub async fn create_post(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> AppResult<impl IntoResponse> {
    let title = super::require_trimmed(payload.title.as_deref(), "제목은 필수입니다.")?;
    let content = super::require_trimmed(payload.content.as_deref(), "내용은 필수입니다.")?;
    let category_id = payload
        .category_id
        .ok_or_else(|| AppError::Validation("카테고리는 필수입니다.".to_string()))?;

    let created = PostService::new(db)
        .create(auth_user.id, &title, &content, category_id)
        .await
        .map_err(|e| e.fail_with("게시글 작성에 실패했습니다."))?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(created))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn update_post(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
    Json(payload): Json<UpdatePostRequest>,
) -> AppResult<impl IntoResponse> {
    // Omitted fields stay untouched; supplied fields must be non-blank.
    let title = payload
        .title
        .map(|t| super::require_trimmed(Some(t.as_str()), "제목은 필수입니다."))
        .transpose()?;
    let content = payload
        .content
        .map(|c| super::require_trimmed(Some(c.as_str()), "내용은 필수입니다."))
        .transpose()?;

    let patch = PostPatch {
        title,
        content,
        category_id: payload.category_id,
    };

    let updated = PostService::new(db)
        .update(id, auth_user.id, patch)
        .await
        .map_err(|e| e.fail_with("게시글 수정에 실패했습니다."))?;

    Ok(Json(PostResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Post not found", body = AppError),
    ),
    tag = "posts"
)]
pub async fn delete_post(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    PostService::new(db)
        .delete(id, auth_user.id)
        .await
        .map_err(|e| e.fail_with("게시글 삭제에 실패했습니다."))?;

    Ok(Json(json!({ "message": "게시글이 삭제되었습니다." })))
}
