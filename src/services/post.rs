use crate::{
    error::{AppError, AppResult},
    models::{category, comment, post, user},
    models::{Category, CategoryModel, Comment, Post, PostModel, User, UserModel},
    response::Pagination,
    utils::generate_post_slug,
};
use sea_orm::{
    sea_query::{extension::postgres::PgExpr, Expr},
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, Statement,
};
use std::collections::HashMap;

/// A post together with the references every list/detail response embeds.
pub struct PostWithRefs {
    pub post: PostModel,
    pub author: Option<UserModel>,
    pub category: Option<CategoryModel>,
}

pub struct ListedPost {
    pub post: PostModel,
    pub author: Option<UserModel>,
    pub category: Option<CategoryModel>,
    pub comment_count: i64,
}

pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i32>,
}

pub struct PostService {
    db: DatabaseConnection,
}

impl PostService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Board listing: published posts, notices first, newest first.
    /// An unknown category slug matches nothing rather than erroring.
    pub async fn list(
        &self,
        category_slug: Option<&str>,
        search: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<(Vec<ListedPost>, u64)> {
        let mut query = Post::find().filter(post::Column::IsPublished.eq(true));

        match self.resolve_category(category_slug).await? {
            CategoryFilter::None => {}
            CategoryFilter::Id(id) => query = query.filter(post::Column::CategoryId.eq(id)),
            CategoryFilter::NoMatch => return Ok((Vec::new(), 0)),
        }

        if let Some(q) = search {
            query = query.filter(text_match_condition(q));
        }

        let query = query
            .order_by_desc(post::Column::IsNotice)
            .order_by_desc(post::Column::CreatedAt);

        self.fetch_page(query, pagination).await
    }

    /// Free-text search across title and content, newest first. The blank
    /// query rejection happens at the handler; this always has a term.
    pub async fn search(
        &self,
        query_text: &str,
        category_slug: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<(Vec<ListedPost>, u64)> {
        let mut query = Post::find().filter(text_match_condition(query_text));

        match self.resolve_category(category_slug).await? {
            CategoryFilter::None => {}
            CategoryFilter::Id(id) => query = query.filter(post::Column::CategoryId.eq(id)),
            CategoryFilter::NoMatch => return Ok((Vec::new(), 0)),
        }

        let query = query.order_by_desc(post::Column::CreatedAt);

        self.fetch_page(query, pagination).await
    }

    /// Detail lookup. Bumps the view counter after a successful fetch; the
    /// increment is a single unguarded UPDATE, so rapid repeated fetches
    /// each count (known, accepted race). The returned model carries the
    /// pre-increment count.
    pub async fn get_detail(&self, id: i32) -> AppResult<PostWithRefs> {
        let post = Post::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("게시글을 찾을 수 없습니다.".to_string()))?;

        self.db
            .execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "UPDATE posts SET view_count = view_count + 1 WHERE id = $1",
                vec![id.into()],
            ))
            .await?;

        self.with_refs(post).await
    }

    pub async fn create(
        &self,
        user_id: i32,
        title: &str,
        content: &str,
        category_id: i32,
    ) -> AppResult<PostWithRefs> {
        let now = chrono::Utc::now().naive_utc();
        let slug = generate_post_slug(title);

        let created = post::ActiveModel {
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            slug: Set(slug),
            view_count: Set(0),
            is_notice: Set(false),
            is_published: Set(true),
            user_id: Set(user_id),
            category_id: Set(category_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.with_refs(created).await
    }

    /// Owner-only partial update. The existence check and the ownership
    /// check share one lookup, performed before anything is written.
    pub async fn update(&self, id: i32, user_id: i32, patch: PostPatch) -> AppResult<PostWithRefs> {
        let existing = Post::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("게시글을 찾을 수 없습니다.".to_string()))?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden("수정 권한이 없습니다.".to_string()));
        }

        let mut active: post::ActiveModel = existing.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(chrono::Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        self.with_refs(updated).await
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> AppResult<()> {
        let existing = Post::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("게시글을 찾을 수 없습니다.".to_string()))?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden("삭제 권한이 없습니다.".to_string()));
        }

        Post::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn resolve_category(&self, slug: Option<&str>) -> AppResult<CategoryFilter> {
        let Some(slug) = slug else {
            return Ok(CategoryFilter::None);
        };

        let category = Category::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;

        Ok(match category {
            Some(c) => CategoryFilter::Id(c.id),
            None => CategoryFilter::NoMatch,
        })
    }

    /// Count and page fetch are two independent queries over the same
    /// filter (the paginator issues both).
    async fn fetch_page(
        &self,
        query: Select<Post>,
        pagination: Pagination,
    ) -> AppResult<(Vec<ListedPost>, u64)> {
        let paginator = query.paginate(&self.db, pagination.take());
        let total = paginator.num_items().await?;
        let posts = paginator.fetch_page(pagination.page - 1).await?;

        let listed = self.hydrate(posts).await?;
        Ok((listed, total))
    }

    /// Batch-load the authors, categories, and comment counts for a page
    /// of posts.
    async fn hydrate(&self, posts: Vec<PostModel>) -> AppResult<Vec<ListedPost>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        let user_ids: Vec<i32> = posts.iter().map(|p| p.user_id).collect();
        let category_ids: Vec<i32> = posts.iter().map(|p| p.category_id).collect();

        let users: HashMap<i32, UserModel> = User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let categories: HashMap<i32, CategoryModel> = Category::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let counts: HashMap<i32, i64> = Comment::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(comment::Column::Id.count(), "count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| ListedPost {
                author: users.get(&post.user_id).cloned(),
                category: categories.get(&post.category_id).cloned(),
                comment_count: counts.get(&post.id).copied().unwrap_or(0),
                post,
            })
            .collect())
    }

    async fn with_refs(&self, post: PostModel) -> AppResult<PostWithRefs> {
        let author = User::find_by_id(post.user_id).one(&self.db).await?;
        let category = Category::find_by_id(post.category_id).one(&self.db).await?;

        Ok(PostWithRefs {
            post,
            author,
            category,
        })
    }
}

enum CategoryFilter {
    None,
    Id(i32),
    NoMatch,
}

fn text_match_condition(query_text: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(query_text));
    Condition::any()
        .add(Expr::col(post::Column::Title).ilike(pattern.clone()))
        .add(Expr::col(post::Column::Content).ilike(pattern))
}

/// Escape LIKE metacharacters so a user query matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_passes_plain_text() {
        assert_eq!(escape_like("바람의나라"), "바람의나라");
    }

    #[test]
    fn escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
