use crate::{
    error::AppResult,
    models::{category, Category, CategoryModel},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

pub struct CategoryService {
    db: DatabaseConnection,
}

impl CategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Active boards in display order.
    pub async fn list_active(&self) -> AppResult<Vec<CategoryModel>> {
        let categories = Category::find()
            .filter(category::Column::IsActive.eq(true))
            .order_by_asc(category::Column::SortOrder)
            .all(&self.db)
            .await?;

        Ok(categories)
    }
}
