use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Categories {
    Table,
    Slug,
    Name,
    Description,
    SortOrder,
}

/// Seed the five launch boards. Idempotent: re-running skips existing slugs.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let boards = [
            ("free", "자유게시판", "자유롭게 이야기를 나누는 공간입니다.", 1),
            ("guide", "공략게시판", "게임 공략과 팁을 공유하는 공간입니다.", 2),
            ("qna", "질문게시판", "게임 관련 질문을 올리는 공간입니다.", 3),
            ("trade", "거래게시판", "아이템 거래를 위한 공간입니다.", 4),
            ("guild", "길드홍보", "길드를 홍보하는 공간입니다.", 5),
        ];

        for (slug, name, description, sort_order) in boards {
            let insert = Query::insert()
                .into_table(Categories::Table)
                .columns([
                    Categories::Slug,
                    Categories::Name,
                    Categories::Description,
                    Categories::SortOrder,
                ])
                .values_panic([
                    slug.into(),
                    name.into(),
                    description.into(),
                    sort_order.into(),
                ])
                .on_conflict(
                    OnConflict::column(Categories::Slug)
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let slugs = ["free", "guide", "qna", "trade", "guild"];
        let delete = Query::delete()
            .from_table(Categories::Table)
            .cond_where(Expr::col(Categories::Slug).is_in(slugs))
            .to_owned();

        manager.exec_stmt(delete).await?;
        Ok(())
    }
}
