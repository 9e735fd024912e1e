//! Order entity for SeaORM.

use sea_orm::entity::prelude::*;

use mealhub_core::domain::OrderStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    #[sea_orm(column_type = "Double")]
    pub total_price: f64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    Item,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for mealhub_core::domain::Order {
    fn from(model: Model) -> Self {
        let status = model.status.parse().unwrap_or_else(|e| {
            tracing::warn!(order_id = %model.id, error = %e, "Unknown order status, treating as pending");
            OrderStatus::Pending
        });

        Self {
            id: model.id,
            customer_id: model.customer_id,
            status,
            total_price: model.total_price,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
