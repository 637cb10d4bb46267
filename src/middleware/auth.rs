use crate::{
    error::AppError,
    models::{User, UserRole},
    utils::{
        cookie::{extract_cookie, ACCESS_TOKEN_COOKIE},
        jwt::decode_access_token,
    },
};
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use sea_orm::{DatabaseConnection, EntityTrait};

/// The resolved caller. Session resolution fails closed: any problem with
/// the token (absent, malformed, expired, bad user id) yields `Anonymous`,
/// never an authenticated identity with a missing id.
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    Authenticated { id: i32, name: String },
}

impl Identity {
    pub fn from_headers(headers: &HeaderMap) -> Identity {
        let Some(token) =
            extract_bearer_token(headers).or_else(|| extract_cookie(headers, ACCESS_TOKEN_COOKIE))
        else {
            return Identity::Anonymous;
        };

        let Ok(claims) = decode_access_token(&token) else {
            return Identity::Anonymous;
        };

        match claims.sub.parse::<i32>() {
            Ok(id) => Identity::Authenticated {
                id,
                name: claims.name,
            },
            Err(_) => Identity::Anonymous,
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Identity::from_headers(&parts.headers))
    }
}

/// An identity that must be authenticated. Rejects anonymous callers with
/// 401 "로그인이 필요합니다.".
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Identity::from_headers(&parts.headers) {
            Identity::Authenticated { id, name } => Ok(AuthUser { id, name }),
            Identity::Anonymous => Err(AppError::Unauthenticated),
        }
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let token = auth_header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Admin gate for notice mutations. Re-fetches the stored role on every
/// call so a downgrade takes effect on the very next request; a missing
/// user row is treated the same as an insufficient role.
pub async fn require_admin(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
) -> crate::error::AppResult<()> {
    let user = User::find_by_id(auth_user.id).one(db).await?;

    match user {
        Some(u) if u.role.is_at_least(UserRole::Admin) => Ok(()),
        _ => Err(AppError::Forbidden(
            "관리자 권한이 필요합니다.".to_string(),
        )),
    }
}

/// Same check as `require_admin` but for read paths that must not reveal
/// whether the resource exists: `false` instead of a 403.
pub async fn is_admin_identity(
    db: &DatabaseConnection,
    identity: &Identity,
) -> crate::error::AppResult<bool> {
    let Identity::Authenticated { id, .. } = identity else {
        return Ok(false);
    };

    let user = User::find_by_id(*id).one(db).await?;
    Ok(user.is_some_and(|u| u.role.is_at_least(UserRole::Admin)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn ensure_config() {
        INIT.call_once(|| {
            std::env::set_var("JWT_SECRET", "a_very_long_secret_key_that_is_at_least_32_chars");
            let config = crate::config::jwt::JwtConfig::from_env().unwrap();
            let _ = crate::utils::jwt::init_jwt_config(config);
        });
    }

    #[test]
    fn missing_header_resolves_anonymous() {
        ensure_config();
        let headers = HeaderMap::new();
        assert!(matches!(
            Identity::from_headers(&headers),
            Identity::Anonymous
        ));
    }

    #[test]
    fn garbage_token_resolves_anonymous() {
        ensure_config();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not.a.jwt"),
        );
        assert!(matches!(
            Identity::from_headers(&headers),
            Identity::Anonymous
        ));
    }

    #[test]
    fn valid_bearer_token_resolves_identity() {
        ensure_config();
        let token = crate::utils::jwt::encode_access_token(7, "tester").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        match Identity::from_headers(&headers) {
            Identity::Authenticated { id, name } => {
                assert_eq!(id, 7);
                assert_eq!(name, "tester");
            }
            Identity::Anonymous => panic!("expected authenticated identity"),
        }
    }

    #[test]
    fn cookie_token_resolves_identity() {
        ensure_config();
        let token = crate::utils::jwt::encode_access_token(9, "cookie-user").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_str(&format!("access_token={}", token)).unwrap(),
        );
        assert!(matches!(
            Identity::from_headers(&headers),
            Identity::Authenticated { id: 9, .. }
        ));
    }
}
