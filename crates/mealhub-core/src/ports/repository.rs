use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Blog, BlogQuery, Meal, MealReview, NewsletterSubscription, Order, OrderLine, User};
use crate::error::RepoError;
use crate::query::Page;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `RepoError::NotFound` if absent.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// All users, newest first.
    async fn find_all(&self) -> Result<Vec<User>, RepoError>;
}

/// Blog post repository.
#[async_trait]
pub trait BlogRepository: BaseRepository<Blog, Uuid> {
    /// One page of posts matching the query, plus the total match count.
    async fn list(&self, query: &BlogQuery) -> Result<Page<Blog>, RepoError>;

    /// Published posts ordered by likes, then views.
    async fn featured(&self, limit: u64) -> Result<Vec<Blog>, RepoError>;

    /// Atomically add one view. Returns `None` if the post does not exist.
    async fn increment_views(&self, id: Uuid) -> Result<Option<Blog>, RepoError>;

    /// Atomically add one like. Returns `None` if the post does not exist.
    async fn increment_likes(&self, id: Uuid) -> Result<Option<Blog>, RepoError>;
}

/// Newsletter subscription repository.
#[async_trait]
pub trait NewsletterRepository: BaseRepository<NewsletterSubscription, Uuid> {
    async fn find_by_email(&self, email: &str)
    -> Result<Option<NewsletterSubscription>, RepoError>;

    /// Subscriptions, newest first, optionally filtered by status.
    async fn list(&self, is_subscribed: Option<bool>)
    -> Result<Vec<NewsletterSubscription>, RepoError>;
}

/// Read access to provider meals and their reviews.
#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn find_by_provider(&self, provider_id: Uuid) -> Result<Vec<Meal>, RepoError>;

    async fn reviews_for_meals(&self, meal_ids: &[Uuid]) -> Result<Vec<MealReview>, RepoError>;
}

/// Read access to orders and their lines.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Every order line referencing one of the given meals.
    async fn lines_for_meals(&self, meal_ids: &[Uuid]) -> Result<Vec<OrderLine>, RepoError>;

    /// A customer's orders, newest first.
    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, RepoError>;
}
