//! Meal entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "meals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub is_available: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meal_review::Entity")]
    Review,
}

impl Related<super::meal_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for mealhub_core::domain::Meal {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            provider_id: model.provider_id,
            name: model.name,
            description: model.description,
            price: model.price,
            is_available: model.is_available,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
