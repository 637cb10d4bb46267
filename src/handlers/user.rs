use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::UserRole,
    services::user::{NicknameUpdate, ProfileData, UserService},
    utils::format_utc,
};
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileCounts {
    pub posts: u64,
    pub comments: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub nickname: Option<String>,
    pub image: Option<String>,
    pub role: UserRole,
    pub created_at: String,
    /// Post/comment totals, under the key the frontend reads.
    #[serde(rename = "_count")]
    pub count: ProfileCounts,
}

impl From<ProfileData> for ProfileResponse {
    fn from(data: ProfileData) -> Self {
        let u = data.user;
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            nickname: u.nickname,
            image: u.image,
            role: u.role,
            created_at: format_utc(u.created_at),
            count: ProfileCounts {
                posts: data.post_count,
                comments: data.comment_count,
            },
        }
    }
}

/// Nickname is tri-state: omitted leaves it, `null` or `""` clears it,
/// anything else sets it (2-20 characters, unique).
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "super::double_option")]
    pub nickname: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub user: ProfileResponse,
}

#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "Own profile with post/comment counts", body = ProfileResponse),
        (status = 401, description = "Not logged in", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let profile = UserService::new(db)
        .profile(auth_user.id)
        .await
        .map_err(|e: AppError| e.fail_with("프로필 조회에 실패했습니다."))?;

    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    put,
    path = "/api/user/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UpdateProfileResponse),
        (status = 400, description = "Invalid or taken nickname", body = AppError),
        (status = 401, description = "Not logged in", body = AppError),
    ),
    tag = "users"
)]
pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    let update = match payload.nickname {
        None => NicknameUpdate::Unchanged,
        Some(None) => NicknameUpdate::Clear,
        Some(Some(raw)) => {
            let trimmed = raw.trim().to_string();
            if trimmed.is_empty() {
                NicknameUpdate::Clear
            } else {
                NicknameUpdate::Set(trimmed)
            }
        }
    };

    let profile = UserService::new(db)
        .update_nickname(auth_user.id, update)
        .await
        .map_err(|e: AppError| e.fail_with("프로필 수정에 실패했습니다."))?;

    Ok(Json(UpdateProfileResponse {
        success: true,
        user: ProfileResponse::from(profile),
    }))
}
