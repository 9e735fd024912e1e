//! In-memory repositories - used as fallback when no database is configured.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use mealhub_core::domain::{
    Blog, BlogQuery, Meal, MealReview, NewsletterSubscription, Order, OrderLine, User,
};
use mealhub_core::error::RepoError;
use mealhub_core::ports::{
    BaseRepository, BlogRepository, MealRepository, NewsletterRepository, OrderRepository,
    UserRepository,
};
use mealhub_core::query::Page;

/// A record the in-memory store can hold.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// Value that must be unique across the store, if any.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(self.email.as_str())
    }
}

impl Record for Blog {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for NewsletterSubscription {
    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(self.email.as_str())
    }
}

/// Map-backed store with an async RwLock.
pub struct InMemoryRepository<T> {
    store: RwLock<HashMap<Uuid, T>>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    async fn find_by_unique_key(&self, key: &str) -> Option<T> {
        let store = self.store.read().await;
        store
            .values()
            .find(|record| record.unique_key() == Some(key))
            .cloned()
    }

    async fn snapshot(&self) -> Vec<T> {
        self.store.read().await.values().cloned().collect()
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn conflicts<T: Record>(store: &HashMap<Uuid, T>, entity: &T) -> bool {
    match entity.unique_key() {
        Some(key) => store
            .values()
            .any(|other| other.id() != entity.id() && other.unique_key() == Some(key)),
        None => false,
    }
}

#[async_trait]
impl<T: Record> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&entity.id()) || conflicts(&store, &entity) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        store.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }
        if conflicts(&store, &entity) {
            return Err(RepoError::Constraint("Unique value already taken".to_string()));
        }
        store.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryBlogRepository = InMemoryRepository<Blog>;
pub type InMemoryNewsletterRepository = InMemoryRepository<NewsletterSubscription>;

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.find_by_unique_key(email).await)
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let mut users = self.snapshot().await;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}

impl InMemoryBlogRepository {
    async fn bump(&self, id: Uuid, bump: impl FnOnce(&mut Blog)) -> Option<Blog> {
        let mut store = self.store.write().await;
        let blog = store.get_mut(&id)?;
        bump(blog);
        Some(blog.clone())
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn list(&self, query: &BlogQuery) -> Result<Page<Blog>, RepoError> {
        let mut matched: Vec<Blog> = self
            .snapshot()
            .await
            .into_iter()
            .filter(|blog| blog.matches(query))
            .collect();
        matched.sort_by(|a, b| a.compare(b, &query.sort));

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(query.skip() as usize)
            .take(query.limit as usize)
            .collect();
        Ok(Page::new(items, total, query.page, query.limit))
    }

    async fn featured(&self, limit: u64) -> Result<Vec<Blog>, RepoError> {
        let mut published: Vec<Blog> = self
            .snapshot()
            .await
            .into_iter()
            .filter(|blog| blog.published)
            .collect();
        published.sort_by(|a, b| b.likes.cmp(&a.likes).then(b.views.cmp(&a.views)));
        published.truncate(limit as usize);
        Ok(published)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        Ok(self.bump(id, |blog| blog.views += 1).await)
    }

    async fn increment_likes(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        Ok(self.bump(id, |blog| blog.likes += 1).await)
    }
}

#[async_trait]
impl NewsletterRepository for InMemoryNewsletterRepository {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscription>, RepoError> {
        Ok(self.find_by_unique_key(email).await)
    }

    async fn list(
        &self,
        is_subscribed: Option<bool>,
    ) -> Result<Vec<NewsletterSubscription>, RepoError> {
        let mut subscriptions: Vec<NewsletterSubscription> = self
            .snapshot()
            .await
            .into_iter()
            .filter(|s| is_subscribed.is_none_or(|flag| s.is_subscribed == flag))
            .collect();
        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(subscriptions)
    }
}

/// Meals and reviews. Meal management lives outside this service, so the
/// store is filled through the seed methods.
#[derive(Default)]
pub struct InMemoryMealRepository {
    meals: RwLock<Vec<Meal>>,
    reviews: RwLock<Vec<MealReview>>,
}

impl InMemoryMealRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_meal(&self, meal: Meal) {
        self.meals.write().await.push(meal);
    }

    pub async fn insert_review(&self, review: MealReview) {
        self.reviews.write().await.push(review);
    }
}

#[async_trait]
impl MealRepository for InMemoryMealRepository {
    async fn find_by_provider(&self, provider_id: Uuid) -> Result<Vec<Meal>, RepoError> {
        let meals = self.meals.read().await;
        Ok(meals
            .iter()
            .filter(|m| m.provider_id == provider_id)
            .cloned()
            .collect())
    }

    async fn reviews_for_meals(&self, meal_ids: &[Uuid]) -> Result<Vec<MealReview>, RepoError> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .filter(|r| meal_ids.contains(&r.meal_id))
            .cloned()
            .collect())
    }
}

/// Orders and their lines, filled through [`InMemoryOrderRepository::insert_order`].
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
    lines: RwLock<Vec<OrderLine>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_order(&self, order: Order, lines: Vec<OrderLine>) {
        self.orders.write().await.push(order);
        self.lines.write().await.extend(lines);
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn lines_for_meals(&self, meal_ids: &[Uuid]) -> Result<Vec<OrderLine>, RepoError> {
        let lines = self.lines.read().await;
        Ok(lines
            .iter()
            .filter(|l| meal_ids.contains(&l.meal_id))
            .cloned()
            .collect())
    }

    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, RepoError> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealhub_core::domain::{NewBlog, NewUser, Role};

    fn user(email: &str) -> User {
        User::new(NewUser {
            name: "Lin".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Customer,
        })
    }

    fn blog(title: &str) -> Blog {
        Blog::new(NewBlog {
            title: title.to_string(),
            content: "Body".to_string(),
            author: "Lin".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        let saved = repo.insert(user("lin@example.com")).await.unwrap();
        let found = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found.email, "lin@example.com");
        assert!(repo.find_by_email("lin@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_constraint_error() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("lin@example.com")).await.unwrap();
        let result = repo.insert(user("lin@example.com")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryBlogRepository::new();
        let result = repo.update(blog("Ghost")).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_increment_missing_is_none() {
        let repo = InMemoryBlogRepository::new();
        assert!(repo.increment_views(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_featured_orders_by_likes_then_views() {
        let repo = InMemoryBlogRepository::new();
        let mut a = blog("A");
        a.likes = 5;
        let mut b = blog("B");
        b.likes = 5;
        b.views = 10;
        let mut hidden = blog("Hidden");
        hidden.likes = 50;
        hidden.published = false;
        for post in [a, b, hidden] {
            repo.insert(post).await.unwrap();
        }

        let titles: Vec<String> = repo
            .featured(3)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }
}
