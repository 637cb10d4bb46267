use crate::{
    error::{AppError, AppResult},
    models::{comment, post, user},
    models::{Comment, Post, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter,
};

pub struct ProfileData {
    pub user: UserModel,
    pub post_count: u64,
    pub comment_count: u64,
}

/// Nickname changes are tri-state at the API boundary; by the time they
/// reach the service they are one of these.
pub enum NicknameUpdate {
    Unchanged,
    Clear,
    Set(String),
}

pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn profile(&self, user_id: i32) -> AppResult<ProfileData> {
        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다.".to_string()))?;

        self.with_counts(user).await
    }

    /// Nickname validation happens here: trimmed length 2..=20 (counted in
    /// characters, not bytes) and uniqueness among other users. Clearing is
    /// always permitted. The check-then-write is not transactional; the
    /// unique index is the real guarantee.
    pub async fn update_nickname(
        &self,
        user_id: i32,
        update: NicknameUpdate,
    ) -> AppResult<ProfileData> {
        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다.".to_string()))?;

        let nickname = match update {
            NicknameUpdate::Unchanged => return self.with_counts(user).await,
            NicknameUpdate::Clear => None,
            NicknameUpdate::Set(value) => {
                let length = value.chars().count();
                if !(2..=20).contains(&length) {
                    return Err(AppError::Validation(
                        "닉네임은 2자 이상 20자 이하로 입력해주세요.".to_string(),
                    ));
                }

                let taken = User::find()
                    .filter(user::Column::Nickname.eq(value.clone()))
                    .filter(user::Column::Id.ne(user_id))
                    .one(&self.db)
                    .await?
                    .is_some();
                if taken {
                    return Err(AppError::Validation(
                        "이미 사용 중인 닉네임입니다.".to_string(),
                    ));
                }

                Some(value)
            }
        };

        let mut active: user::ActiveModel = user.into();
        active.nickname = Set(nickname);
        active.updated_at = Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        self.with_counts(updated).await
    }

    async fn with_counts(&self, user: UserModel) -> AppResult<ProfileData> {
        let post_count = Post::find()
            .filter(post::Column::UserId.eq(user.id))
            .count(&self.db)
            .await?;
        let comment_count = Comment::find()
            .filter(comment::Column::UserId.eq(user.id))
            .count(&self.db)
            .await?;

        Ok(ProfileData {
            user,
            post_count,
            comment_count,
        })
    }
}
