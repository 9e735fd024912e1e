//! Newsletter subscription entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "newsletters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub is_subscribed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for mealhub_core::domain::NewsletterSubscription {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            is_subscribed: model.is_subscribed,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<mealhub_core::domain::NewsletterSubscription> for ActiveModel {
    fn from(sub: mealhub_core::domain::NewsletterSubscription) -> Self {
        Self {
            id: Set(sub.id),
            email: Set(sub.email),
            is_subscribed: Set(sub.is_subscribed),
            created_at: Set(sub.created_at.into()),
            updated_at: Set(sub.updated_at.into()),
        }
    }
}
