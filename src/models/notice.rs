use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeType {
    #[sea_orm(string_value = "NOTICE")]
    Notice,
    #[sea_orm(string_value = "EVENT")]
    Event,
    #[sea_orm(string_value = "UPDATE")]
    Update,
    #[sea_orm(string_value = "MAINTENANCE")]
    Maintenance,
}

impl NoticeType {
    /// Parse a query-string type filter. Unrecognized values mean
    /// "no filter", never an error.
    pub fn parse_filter(value: &str) -> Option<NoticeType> {
        match value {
            "NOTICE" => Some(NoticeType::Notice),
            "EVENT" => Some(NoticeType::Event),
            "UPDATE" => Some(NoticeType::Update),
            "MAINTENANCE" => Some(NoticeType::Maintenance),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "notices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub notice_type: NoticeType,
    pub is_pinned: bool,
    pub is_published: bool,
    /// Optional display window; both ends independently nullable.
    pub start_date: Option<DateTime>,
    pub end_date: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_type_filters_parse() {
        assert_eq!(NoticeType::parse_filter("EVENT"), Some(NoticeType::Event));
        assert_eq!(
            NoticeType::parse_filter("MAINTENANCE"),
            Some(NoticeType::Maintenance)
        );
    }

    #[test]
    fn unknown_type_filter_is_ignored() {
        assert_eq!(NoticeType::parse_filter("PARTY"), None);
        assert_eq!(NoticeType::parse_filter(""), None);
        // case-sensitive on purpose: the frontend sends the enum values verbatim
        assert_eq!(NoticeType::parse_filter("event"), None);
    }
}
