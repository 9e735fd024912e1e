//! Services - one per resource, each wrapping one or two repository calls.

mod blog;
mod dashboard;
mod newsletter;
mod user;

pub use blog::{BLOG_PAGE_SIZE, BlogService, FEATURED_LIMIT};
pub use dashboard::{
    CustomerDashboardStats, DashboardService, ProviderDashboardStats, RatingStats,
    summarize_customer, summarize_provider,
};
pub use newsletter::NewsletterService;
pub use user::{MIN_PASSWORD_LEN, Registration, UserService};

use uuid::Uuid;

use crate::error::DomainError;

/// Parse a path identifier, reporting malformed input as `InvalidId`.
pub fn parse_id(entity_type: &'static str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::InvalidId {
        entity_type,
        value: raw.to_string(),
    })
}
