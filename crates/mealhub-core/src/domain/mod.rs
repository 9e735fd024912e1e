//! Domain entities - the core business objects.

mod blog;
mod meal;
mod newsletter;
mod order;
mod user;

pub use blog::{AuthorSummary, Blog, BlogDetail, BlogField, BlogPatch, BlogQuery, NewBlog};
pub use meal::{Meal, MealReview};
pub use newsletter::{NewsletterSubscription, normalize_email};
pub use order::{Order, OrderLine, OrderStatus};
pub use user::{Actor, NewUser, Role, User, UserPatch};
