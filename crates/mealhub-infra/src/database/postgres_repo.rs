//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use uuid::Uuid;

use mealhub_core::domain::{
    Blog, BlogField, BlogQuery, Meal, MealReview, NewsletterSubscription, OrderLine, User,
};
use mealhub_core::error::RepoError;
use mealhub_core::ports::{
    BlogRepository, MealRepository, NewsletterRepository, OrderRepository, UserRepository,
};
use mealhub_core::query::{Page, QueryField, SortOrder};

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::meal::{self, Entity as MealEntity};
use super::entity::meal_review::{self, Entity as MealReviewEntity};
use super::entity::newsletter::{self, Entity as NewsletterEntity};
use super::entity::order::{self, Entity as OrderEntity};
use super::entity::order_item::{self, Entity as OrderItemEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_err, write_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

/// PostgreSQL newsletter repository.
pub type PostgresNewsletterRepository = PostgresBaseRepository<NewsletterEntity>;

/// PostgreSQL meal and review reads.
pub type PostgresMealRepository = PostgresBaseRepository<MealEntity>;

/// PostgreSQL order and order line reads.
pub type PostgresOrderRepository = PostgresBaseRepository<OrderEntity>;

/// Keep the first character of the local part, hide the rest.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn())
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

fn blog_column(field: BlogField) -> blog::Column {
    match field {
        BlogField::Title => blog::Column::Title,
        BlogField::Content => blog::Column::Content,
        BlogField::Author => blog::Column::Author,
        BlogField::Category => blog::Column::Category,
        BlogField::Published => blog::Column::Published,
        BlogField::Views => blog::Column::Views,
        BlogField::Likes => blog::Column::Likes,
        BlogField::CreatedAt => blog::Column::CreatedAt,
        BlogField::UpdatedAt => blog::Column::UpdatedAt,
    }
}

const LIKE_ESCAPE: char = '\\';

/// Lowercased `%term%` with the LIKE wildcards in `term` escaped, so the
/// search is a literal substring match.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn blog_condition(query: &BlogQuery) -> Result<Condition, RepoError> {
    let mut condition = Condition::all();

    if let Some(term) = &query.search_term {
        let pattern = contains_pattern(term);
        let search = BlogField::searchable()
            .iter()
            .fold(Condition::any(), |any, field| {
                let like = LikeExpr::new(pattern.as_str()).escape(LIKE_ESCAPE);
                any.add(Expr::expr(Func::lower(Expr::col(blog_column(*field)))).like(like))
            });
        condition = condition.add(search);
    }

    for (field, value) in &query.filters {
        let column = blog_column(*field);
        condition = match field {
            BlogField::Published => {
                let flag: bool = value.parse().map_err(|_| {
                    RepoError::Query(format!("invalid boolean filter value: {value}"))
                })?;
                condition.add(column.eq(flag))
            }
            _ => condition.add(column.eq(value.as_str())),
        };
    }

    Ok(condition)
}

fn apply_blog_sort(mut select: Select<BlogEntity>, query: &BlogQuery) -> Select<BlogEntity> {
    for (field, order) in &query.sort {
        let order = match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        select = select.order_by(blog_column(*field), order);
    }
    select
}

impl PostgresBlogRepository {
    async fn increment(&self, id: Uuid, column: blog::Column) -> Result<Option<Blog>, RepoError> {
        let result = BlogEntity::update_many()
            .col_expr(column, Expr::col(column).add(1i64))
            .filter(blog::Column::Id.eq(id))
            .exec(self.conn())
            .await
            .map_err(write_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let model = BlogEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn list(&self, query: &BlogQuery) -> Result<Page<Blog>, RepoError> {
        let select = BlogEntity::find().filter(blog_condition(query)?);

        let total = select.clone().count(self.conn()).await.map_err(query_err)?;
        let models = apply_blog_sort(select, query)
            .offset(query.skip())
            .limit(query.limit)
            .all(self.conn())
            .await
            .map_err(query_err)?;

        tracing::debug!(total, returned = models.len(), "Listed blogs");
        Ok(Page::new(
            models.into_iter().map(Into::into).collect(),
            total,
            query.page,
            query.limit,
        ))
    }

    async fn featured(&self, limit: u64) -> Result<Vec<Blog>, RepoError> {
        let models = BlogEntity::find()
            .filter(blog::Column::Published.eq(true))
            .order_by_desc(blog::Column::Likes)
            .order_by_desc(blog::Column::Views)
            .limit(limit)
            .all(self.conn())
            .await
            .map_err(query_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        self.increment(id, blog::Column::Views).await
    }

    async fn increment_likes(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        self.increment(id, blog::Column::Likes).await
    }
}

#[async_trait]
impl NewsletterRepository for PostgresNewsletterRepository {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscription>, RepoError> {
        let result = NewsletterEntity::find()
            .filter(newsletter::Column::Email.eq(email))
            .one(self.conn())
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(
        &self,
        is_subscribed: Option<bool>,
    ) -> Result<Vec<NewsletterSubscription>, RepoError> {
        let mut select = NewsletterEntity::find();
        if let Some(flag) = is_subscribed {
            select = select.filter(newsletter::Column::IsSubscribed.eq(flag));
        }

        let result = select
            .order_by_desc(newsletter::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl MealRepository for PostgresMealRepository {
    async fn find_by_provider(&self, provider_id: Uuid) -> Result<Vec<Meal>, RepoError> {
        let result = MealEntity::find()
            .filter(meal::Column::ProviderId.eq(provider_id))
            .all(self.conn())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn reviews_for_meals(&self, meal_ids: &[Uuid]) -> Result<Vec<MealReview>, RepoError> {
        let result = MealReviewEntity::find()
            .filter(meal_review::Column::MealId.is_in(meal_ids.iter().copied()))
            .all(self.conn())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn lines_for_meals(&self, meal_ids: &[Uuid]) -> Result<Vec<OrderLine>, RepoError> {
        let result = OrderItemEntity::find()
            .filter(order_item::Column::MealId.is_in(meal_ids.iter().copied()))
            .all(self.conn())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<mealhub_core::domain::Order>, RepoError> {
        let result = OrderEntity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(self.conn())
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
