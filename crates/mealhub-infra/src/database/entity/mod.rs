//! SeaORM entities and their conversions to domain types.

pub mod blog;
pub mod meal;
pub mod meal_review;
pub mod newsletter;
pub mod order;
pub mod order_item;
pub mod user;
