//! Role dashboards. Aggregation happens in memory over plain reads.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Meal, MealReview, Order, OrderLine, OrderStatus};
use crate::error::DomainError;
use crate::ports::{MealRepository, OrderRepository};

const RECENT_ORDERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    /// Mean of every review, two decimals. `None` without reviews.
    pub average_rating: Option<f64>,
    pub total_ratings: u64,
    pub meals_with_ratings: u64,
    pub total_meals: u64,
    /// Share of meals with at least one review, in percent.
    pub rating_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDashboardStats {
    pub total_meals: u64,
    pub active_meals: u64,
    pub total_orders: u64,
    pub total_revenue: f64,
    pub rating_stats: RatingStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDashboardStats {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub processing_orders: u64,
    pub delivered_orders: u64,
    pub cancelled_orders: u64,
    /// Sum over non-cancelled orders.
    pub total_spent: f64,
    pub recent_orders: Vec<Order>,
}

#[derive(Clone)]
pub struct DashboardService {
    meals: Arc<dyn MealRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl DashboardService {
    pub fn new(meals: Arc<dyn MealRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { meals, orders }
    }

    pub async fn provider_stats(
        &self,
        provider_id: Uuid,
    ) -> Result<ProviderDashboardStats, DomainError> {
        let meals = self.meals.find_by_provider(provider_id).await?;
        let meal_ids: Vec<Uuid> = meals.iter().map(|m| m.id).collect();

        let (lines, reviews) = if meal_ids.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            (
                self.orders.lines_for_meals(&meal_ids).await?,
                self.meals.reviews_for_meals(&meal_ids).await?,
            )
        };

        Ok(summarize_provider(&meals, &lines, &reviews))
    }

    pub async fn customer_stats(
        &self,
        customer_id: Uuid,
    ) -> Result<CustomerDashboardStats, DomainError> {
        let orders = self.orders.find_by_customer(customer_id).await?;
        Ok(summarize_customer(orders))
    }
}

/// Provider totals. Lines and reviews for meals outside `meals` are ignored,
/// so revenue only counts the provider's own share of mixed orders.
pub fn summarize_provider(
    meals: &[Meal],
    lines: &[OrderLine],
    reviews: &[MealReview],
) -> ProviderDashboardStats {
    let own: HashSet<Uuid> = meals.iter().map(|m| m.id).collect();
    let total_meals = meals.len() as u64;

    let own_lines: Vec<&OrderLine> = lines.iter().filter(|l| own.contains(&l.meal_id)).collect();
    let total_orders = own_lines
        .iter()
        .map(|l| l.order_id)
        .collect::<HashSet<_>>()
        .len() as u64;
    let total_revenue = round2(own_lines.iter().map(|l| l.subtotal).sum());

    let own_reviews: Vec<&MealReview> = reviews
        .iter()
        .filter(|r| own.contains(&r.meal_id))
        .collect();
    let total_ratings = own_reviews.len() as u64;
    let meals_with_ratings = own_reviews
        .iter()
        .map(|r| r.meal_id)
        .collect::<HashSet<_>>()
        .len() as u64;
    let rating_sum: i64 = own_reviews.iter().map(|r| i64::from(r.rating)).sum();

    ProviderDashboardStats {
        total_meals,
        active_meals: meals.iter().filter(|m| m.is_available).count() as u64,
        total_orders,
        total_revenue,
        rating_stats: RatingStats {
            average_rating: (total_ratings > 0)
                .then(|| round2(rating_sum as f64 / total_ratings as f64)),
            total_ratings,
            meals_with_ratings,
            total_meals,
            rating_percentage: if total_meals > 0 {
                round2(meals_with_ratings as f64 / total_meals as f64 * 100.0)
            } else {
                0.0
            },
        },
    }
}

pub fn summarize_customer(mut orders: Vec<Order>) -> CustomerDashboardStats {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count() as u64;
    let total_spent = round2(
        orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total_price)
            .sum(),
    );

    CustomerDashboardStats {
        total_orders: orders.len() as u64,
        pending_orders: count(OrderStatus::Pending),
        processing_orders: count(OrderStatus::Processing),
        delivered_orders: count(OrderStatus::Delivered),
        cancelled_orders: count(OrderStatus::Cancelled),
        total_spent,
        recent_orders: orders.into_iter().take(RECENT_ORDERS).collect(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn meal(provider_id: Uuid, available: bool) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            provider_id,
            name: "Dal".to_string(),
            description: String::new(),
            price: 8.5,
            is_available: available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(order_id: Uuid, meal_id: Uuid, subtotal: f64) -> OrderLine {
        OrderLine {
            id: Uuid::new_v4(),
            order_id,
            meal_id,
            quantity: 1,
            subtotal,
        }
    }

    fn review(meal_id: Uuid, rating: i32) -> MealReview {
        MealReview {
            id: Uuid::new_v4(),
            meal_id,
            customer_id: Uuid::new_v4(),
            rating,
            comment: None,
            created_at: Utc::now(),
        }
    }

    fn order(status: OrderStatus, total: f64, age_minutes: i64) -> Order {
        let at = Utc::now() - Duration::minutes(age_minutes);
        Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            status,
            total_price: total,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_provider_summary_counts_only_own_lines() {
        let provider = Uuid::new_v4();
        let meals = vec![meal(provider, true), meal(provider, false)];
        let foreign_meal = Uuid::new_v4();
        let shared_order = Uuid::new_v4();
        let lines = vec![
            line(shared_order, meals[0].id, 10.0),
            line(shared_order, foreign_meal, 99.0),
            line(shared_order, meals[1].id, 5.25),
            line(Uuid::new_v4(), meals[0].id, 10.0),
        ];

        let stats = summarize_provider(&meals, &lines, &[]);
        assert_eq!(stats.total_meals, 2);
        assert_eq!(stats.active_meals, 1);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_revenue, 25.25);
    }

    #[test]
    fn test_rating_stats() {
        let provider = Uuid::new_v4();
        let meals = vec![meal(provider, true), meal(provider, true), meal(provider, true)];
        let reviews = vec![
            review(meals[0].id, 5),
            review(meals[0].id, 4),
            review(meals[1].id, 4),
        ];

        let stats = summarize_provider(&meals, &[], &reviews).rating_stats;
        assert_eq!(stats.average_rating, Some(4.33));
        assert_eq!(stats.total_ratings, 3);
        assert_eq!(stats.meals_with_ratings, 2);
        assert_eq!(stats.rating_percentage, 66.67);
    }

    #[test]
    fn test_rating_stats_without_reviews() {
        let stats = summarize_provider(&[], &[], &[]).rating_stats;
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.rating_percentage, 0.0);
    }

    #[test]
    fn test_customer_summary() {
        let orders = vec![
            order(OrderStatus::Delivered, 20.0, 60),
            order(OrderStatus::Cancelled, 50.0, 30),
            order(OrderStatus::Pending, 12.5, 1),
        ];

        let stats = summarize_customer(orders);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.cancelled_orders, 1);
        assert_eq!(stats.total_spent, 32.5);
        assert_eq!(stats.recent_orders[0].status, OrderStatus::Pending);
    }

    #[test]
    fn test_customer_summary_keeps_five_recent() {
        let orders = (0..8)
            .map(|i| order(OrderStatus::Delivered, 1.0, i))
            .collect();
        assert_eq!(summarize_customer(orders).recent_orders.len(), 5);
    }
}
