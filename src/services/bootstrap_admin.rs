use crate::{
    error::AppResult,
    models::{user, User, UserRole},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter,
};
use std::env;

/// First-admin bootstrap. Google sign-in can only ever create USER rows,
/// so without this there is no in-band way to mint the first admin.
///
/// - If any ADMIN or SUPER_ADMIN already exists: do nothing.
/// - Else if a user with `BOOTSTRAP_ADMIN_EMAIL` exists: promote it.
/// - Else: create that user as SUPER_ADMIN (it gains name/avatar on its
///   first Google login).
pub async fn ensure_bootstrap_admin(db: &DatabaseConnection) -> AppResult<()> {
    let Ok(email) = env::var("BOOTSTRAP_ADMIN_EMAIL") else {
        return Ok(());
    };
    let email = email.trim().to_string();
    if email.is_empty() {
        return Ok(());
    }

    let admin_exists = User::find()
        .filter(
            Condition::any()
                .add(user::Column::Role.eq(UserRole::Admin))
                .add(user::Column::Role.eq(UserRole::SuperAdmin)),
        )
        .one(db)
        .await?
        .is_some();
    if admin_exists {
        return Ok(());
    }

    let existing = User::find()
        .filter(user::Column::Email.eq(email.clone()))
        .one(db)
        .await?;

    let now = chrono::Utc::now().naive_utc();

    if let Some(found) = existing {
        tracing::info!("Promoting {} to SUPER_ADMIN", found.email);
        let mut active: user::ActiveModel = found.into();
        active.role = Set(UserRole::SuperAdmin);
        active.updated_at = Set(now);
        active.update(db).await?;
        return Ok(());
    }

    tracing::info!("Creating bootstrap SUPER_ADMIN {}", email);
    let name = email.split('@').next().unwrap_or("admin").to_string();
    user::ActiveModel {
        email: Set(email),
        name: Set(name),
        nickname: Set(None),
        image: Set(None),
        role: Set(UserRole::SuperAdmin),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(())
}
