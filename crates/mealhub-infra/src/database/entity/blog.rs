//! Blog entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author: String,
    pub author_id: Option<Uuid>,
    pub image: String,
    pub category: String,
    /// JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub published: bool,
    pub views: i64,
    pub likes: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Blog.
impl From<Model> for mealhub_core::domain::Blog {
    fn from(model: Model) -> Self {
        let tags = serde_json::from_value(model.tags).unwrap_or_else(|e| {
            tracing::warn!(blog_id = %model.id, error = %e, "Malformed tags column");
            Vec::new()
        });

        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            author: model.author,
            author_id: model.author_id,
            image: model.image,
            category: model.category,
            tags,
            published: model.published,
            views: model.views,
            likes: model.likes,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Blog to SeaORM ActiveModel.
impl From<mealhub_core::domain::Blog> for ActiveModel {
    fn from(blog: mealhub_core::domain::Blog) -> Self {
        Self {
            id: Set(blog.id),
            title: Set(blog.title),
            content: Set(blog.content),
            author: Set(blog.author),
            author_id: Set(blog.author_id),
            image: Set(blog.image),
            category: Set(blog.category),
            tags: Set(Json::from(blog.tags)),
            published: Set(blog.published),
            views: Set(blog.views),
            likes: Set(blog.likes),
            created_at: Set(blog.created_at.into()),
            updated_at: Set(blog.updated_at.into()),
        }
    }
}
