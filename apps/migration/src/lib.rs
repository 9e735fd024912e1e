//! Schema migrations, applied in order.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_blogs;
mod m20250101_000003_create_newsletters;
mod m20250101_000004_create_meals;
mod m20250101_000005_create_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_blogs::Migration),
            Box::new(m20250101_000003_create_newsletters::Migration),
            Box::new(m20250101_000004_create_meals::Migration),
            Box::new(m20250101_000005_create_orders::Migration),
        ]
    }
}
