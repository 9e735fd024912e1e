//! Line items of an order.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub meal_id: Uuid,
    pub quantity: i32,
    #[sea_orm(column_type = "Double")]
    pub subtotal: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for mealhub_core::domain::OrderLine {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            meal_id: model.meal_id,
            quantity: model.quantity,
            subtotal: model.subtotal,
        }
    }
}
