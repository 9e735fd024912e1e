//! Meals and their reviews.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Meals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Meals::ProviderId).uuid().not_null())
                    .col(ColumnDef::new(Meals::Name).string().not_null())
                    .col(ColumnDef::new(Meals::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Meals::Price).double().not_null())
                    .col(
                        ColumnDef::new(Meals::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Meals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Meals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meals_provider_id")
                            .from(Meals::Table, Meals::ProviderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meals_provider_id")
                    .table(Meals::Table)
                    .col(Meals::ProviderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MealReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MealReviews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MealReviews::MealId).uuid().not_null())
                    .col(ColumnDef::new(MealReviews::CustomerId).uuid().not_null())
                    .col(
                        ColumnDef::new(MealReviews::Rating)
                            .integer()
                            .not_null()
                            .check(Expr::col(MealReviews::Rating).between(1, 5)),
                    )
                    .col(ColumnDef::new(MealReviews::Comment).text())
                    .col(
                        ColumnDef::new(MealReviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meal_reviews_meal_id")
                            .from(MealReviews::Table, MealReviews::MealId)
                            .to(Meals::Table, Meals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meal_reviews_customer_id")
                            .from(MealReviews::Table, MealReviews::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MealReviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Meals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Meals {
    Table,
    Id,
    ProviderId,
    Name,
    Description,
    Price,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MealReviews {
    Table,
    Id,
    MealId,
    CustomerId,
    Rating,
    Comment,
    CreatedAt,
}
