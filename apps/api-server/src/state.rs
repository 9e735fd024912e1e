//! Application state - shared across all handlers.

use std::sync::Arc;

use mealhub_core::ports::{
    BlogRepository, MealRepository, NewsletterRepository, OrderRepository, PasswordService,
    UserRepository,
};
use mealhub_core::services::{BlogService, DashboardService, NewsletterService, UserService};
use mealhub_infra::database::DatabaseConfig;
use mealhub_infra::{
    Argon2PasswordService, InMemoryBlogRepository, InMemoryMealRepository,
    InMemoryNewsletterRepository, InMemoryOrderRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use mealhub_infra::database::{
    DatabaseConnections, PostgresBlogRepository, PostgresMealRepository,
    PostgresNewsletterRepository, PostgresOrderRepository, PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blogs: BlogService,
    pub newsletter: NewsletterService,
    pub users: UserService,
    pub dashboard: DashboardService,
    #[cfg(feature = "postgres")]
    pub db: Option<DatabaseConnections>,
}

/// One repository per resource, whichever backend they come from.
struct Repositories {
    users: Arc<dyn UserRepository>,
    blogs: Arc<dyn BlogRepository>,
    newsletter: Arc<dyn NewsletterRepository>,
    meals: Arc<dyn MealRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            blogs: Arc::new(InMemoryBlogRepository::new()),
            newsletter: Arc::new(InMemoryNewsletterRepository::new()),
            meals: Arc::new(InMemoryMealRepository::new()),
            orders: Arc::new(InMemoryOrderRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.main.clone())),
            blogs: Arc::new(PostgresBlogRepository::new(db.main.clone())),
            newsletter: Arc::new(PostgresNewsletterRepository::new(db.main.clone())),
            meals: Arc::new(PostgresMealRepository::new(db.main.clone())),
            orders: Arc::new(PostgresOrderRepository::new(db.main.clone())),
        }
    }
}

impl AppState {
    /// Build the state, falling back to in-memory repositories when the
    /// database is not configured or unreachable.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let (db, repos) = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let repos = Repositories::postgres(&connections);
                    (Some(connections), repos)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, Repositories::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, Repositories::in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory()
        };

        let state = Self::from_repositories(repos);
        tracing::info!("Application state initialized");

        #[cfg(feature = "postgres")]
        let state = Self { db, ..state };

        state
    }

    /// State over fresh in-memory repositories.
    pub fn in_memory() -> Self {
        Self::from_repositories(Repositories::in_memory())
    }

    /// In-memory state over a caller-held user store, so tests can seed accounts.
    #[cfg(test)]
    pub fn in_memory_with_users(users: Arc<dyn UserRepository>) -> Self {
        Self::from_repositories(Repositories {
            users,
            ..Repositories::in_memory()
        })
    }

    fn from_repositories(repos: Repositories) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            blogs: BlogService::new(repos.blogs, repos.users.clone()),
            newsletter: NewsletterService::new(repos.newsletter),
            users: UserService::new(repos.users, passwords),
            dashboard: DashboardService::new(repos.meals, repos.orders),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}
