use crate::{
    config::google::GoogleConfig,
    error::{AppError, AppResult},
    models::{UserModel, UserRole},
    services::AuthService,
    utils::{
        cookie::{build_auth_cookie, build_clear_cookie, ACCESS_TOKEN_COOKIE},
        format_utc,
        jwt::access_token_ttl_seconds,
    },
};
use axum::{http::header, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    /// Google ID token from the client-side sign-in flow
    pub id_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub nickname: Option<String>,
    pub image: Option<String>,
    pub role: UserRole,
    pub created_at: String,
}

impl From<UserModel> for SessionUser {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            nickname: u.nickname,
            image: u.image,
            role: u.role,
            created_at: format_utc(u.created_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

#[utoipa::path(
    post,
    path = "/api/auth/google",
    request_body = GoogleLoginRequest,
    responses(
        (status = 200, description = "Session established", body = LoginResponse),
        (status = 401, description = "Invalid Google ID token", body = AppError),
    ),
    tag = "auth"
)]
pub async fn google_login(
    Extension(db): Extension<DatabaseConnection>,
    Extension(google): Extension<GoogleConfig>,
    Json(payload): Json<GoogleLoginRequest>,
) -> AppResult<impl IntoResponse> {
    let id_token = payload.id_token.trim();
    if id_token.is_empty() {
        return Err(AppError::Unauthenticated);
    }

    let (token, user) = AuthService::new(db, google)
        .login_with_google(id_token)
        .await
        .map_err(|e| e.fail_with("로그인에 실패했습니다."))?;

    let cookie = build_auth_cookie(ACCESS_TOKEN_COOKIE, &token, access_token_ttl_seconds());

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token,
            user: SessionUser::from(user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared"),
    ),
    tag = "auth"
)]
pub async fn logout() -> impl IntoResponse {
    let cookie = build_clear_cookie(ACCESS_TOKEN_COOKIE);
    ([(header::SET_COOKIE, cookie)], Json(json!({ "success": true })))
}
