use crate::{
    config::google::GoogleConfig,
    error::{AppError, AppResult},
    models::{user, User, UserModel, UserRole},
    utils::encode_access_token,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde::Deserialize;

/// The subset of Google's tokeninfo response the login flow reads.
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

pub struct AuthService {
    db: DatabaseConnection,
    http: reqwest::Client,
    config: GoogleConfig,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, config: GoogleConfig) -> Self {
        Self {
            db,
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Exchange a Google ID token for a first-party session: verify the
    /// token against the tokeninfo endpoint, check the audience, upsert
    /// the user by email, and mint an access token.
    pub async fn login_with_google(&self, id_token: &str) -> AppResult<(String, UserModel)> {
        let info = self.verify_id_token(id_token).await?;
        let user = self.upsert_user(info).await?;

        let token = encode_access_token(user.id, &user.name)?;
        Ok((token, user))
    }

    async fn verify_id_token(&self, id_token: &str) -> AppResult<GoogleTokenInfo> {
        let response = self
            .http
            .get(&self.config.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("tokeninfo request failed: {}", e))?;

        // Google answers 4xx for invalid or expired ID tokens.
        if !response.status().is_success() {
            return Err(AppError::Unauthenticated);
        }

        let info: GoogleTokenInfo = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("tokeninfo response unreadable: {}", e))?;

        if info.aud != self.config.client_id {
            tracing::warn!("Rejected Google ID token with foreign audience");
            return Err(AppError::Unauthenticated);
        }

        Ok(info)
    }

    /// First login creates the row; later logins refresh name and avatar
    /// from Google but never touch nickname or role.
    async fn upsert_user(&self, info: GoogleTokenInfo) -> AppResult<UserModel> {
        let existing = User::find()
            .filter(user::Column::Email.eq(info.email.clone()))
            .one(&self.db)
            .await?;

        let now = chrono::Utc::now().naive_utc();

        if let Some(found) = existing {
            let mut active: user::ActiveModel = found.into();
            if let Some(name) = info.name {
                active.name = Set(name);
            }
            active.image = Set(info.picture);
            active.updated_at = Set(now);
            let updated = active.update(&self.db).await?;
            return Ok(updated);
        }

        let name = info
            .name
            .unwrap_or_else(|| info.email.split('@').next().unwrap_or("user").to_string());

        let created = user::ActiveModel {
            email: Set(info.email),
            name: Set(name),
            nickname: Set(None),
            image: Set(info.picture),
            role: Set(UserRole::User),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(created)
    }
}
