use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role tiers form a total order; only ADMIN and SUPER_ADMIN ever pass an
/// admin gate, but MODERATOR keeps its slot in the ordering.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "MODERATOR")]
    Moderator,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "SUPER_ADMIN")]
    SuperAdmin,
}

impl UserRole {
    pub fn is_at_least(self, threshold: UserRole) -> bool {
        self >= threshold
    }

    pub fn is_admin(self) -> bool {
        self.is_at_least(UserRole::Admin)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    /// Optional display name, unique among non-null values only.
    #[sea_orm(unique)]
    pub nickname: Option<String>,
    pub image: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_order_is_total() {
        assert!(UserRole::User < UserRole::Moderator);
        assert!(UserRole::Moderator < UserRole::Admin);
        assert!(UserRole::Admin < UserRole::SuperAdmin);
    }

    #[test]
    fn is_at_least_is_reflexive() {
        for role in [
            UserRole::User,
            UserRole::Moderator,
            UserRole::Admin,
            UserRole::SuperAdmin,
        ] {
            assert!(role.is_at_least(role));
        }
    }

    #[test]
    fn only_admin_tiers_pass_the_admin_gate() {
        assert!(!UserRole::User.is_admin());
        assert!(!UserRole::Moderator.is_admin());
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::SuperAdmin.is_admin());
    }

    #[test]
    fn roles_serialize_as_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&UserRole::SuperAdmin).unwrap(),
            "\"SUPER_ADMIN\""
        );
    }
}
