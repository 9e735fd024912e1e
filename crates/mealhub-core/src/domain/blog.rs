use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::query::{QueryField, SortOrder, TypedQuery};

/// Blog post entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: Option<Uuid>,
    pub image: String,
    pub category: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub views: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a new blog post. Optional fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: Option<Uuid>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

/// Partial blog update.
#[derive(Debug, Clone, Default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

/// Public profile of the user a post is attributed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A post as returned by the single-post endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetail {
    #[serde(flatten)]
    pub blog: Blog,
    pub author_profile: Option<AuthorSummary>,
}

impl Blog {
    pub const DEFAULT_IMAGE: &'static str = "/images/placeholder.jpg";
    pub const DEFAULT_CATEGORY: &'static str = "General";

    /// Create a post from validated input, applying defaults.
    pub fn new(input: NewBlog) -> Result<Self, DomainError> {
        let title = required("title", &input.title)?;
        required("content", &input.content)?;
        let author = required("author", &input.author)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            content: input.content,
            author,
            author_id: input.author_id,
            image: input.image.unwrap_or_else(|| Self::DEFAULT_IMAGE.to_string()),
            category: input
                .category
                .unwrap_or_else(|| Self::DEFAULT_CATEGORY.to_string()),
            tags: input.tags.unwrap_or_default(),
            published: input.published.unwrap_or(true),
            views: 0,
            likes: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: BlogPatch) -> Result<(), DomainError> {
        if let Some(title) = patch.title {
            self.title = required("title", &title)?;
        }
        if let Some(content) = patch.content {
            required("content", &content)?;
            self.content = content;
        }
        if let Some(author) = patch.author {
            self.author = required("author", &author)?;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether this post satisfies the search term and every filter.
    pub fn matches(&self, query: &BlogQuery) -> bool {
        let searched = match &query.search_term {
            Some(term) => {
                let needle = term.to_lowercase();
                BlogField::searchable()
                    .iter()
                    .any(|field| self.text(*field).to_lowercase().contains(&needle))
            }
            None => true,
        };

        searched
            && query
                .filters
                .iter()
                .all(|(field, value)| self.text(*field) == *value)
    }

    /// Order two posts by a list of sort keys.
    pub fn compare(&self, other: &Blog, sort: &[(BlogField, SortOrder)]) -> Ordering {
        sort.iter()
            .map(|(field, order)| {
                let ordering = match field {
                    BlogField::Views => self.views.cmp(&other.views),
                    BlogField::Likes => self.likes.cmp(&other.likes),
                    BlogField::Published => self.published.cmp(&other.published),
                    BlogField::CreatedAt => self.created_at.cmp(&other.created_at),
                    BlogField::UpdatedAt => self.updated_at.cmp(&other.updated_at),
                    _ => self.text(*field).cmp(&other.text(*field)),
                };
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    fn text(&self, field: BlogField) -> String {
        match field {
            BlogField::Title => self.title.clone(),
            BlogField::Content => self.content.clone(),
            BlogField::Author => self.author.clone(),
            BlogField::Category => self.category.clone(),
            BlogField::Published => self.published.to_string(),
            BlogField::Views => self.views.to_string(),
            BlogField::Likes => self.likes.to_string(),
            BlogField::CreatedAt => self.created_at.to_rfc3339(),
            BlogField::UpdatedAt => self.updated_at.to_rfc3339(),
        }
    }
}

fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Listable blog fields, by their API names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlogField {
    Title,
    Content,
    Author,
    Category,
    Published,
    Views,
    Likes,
    CreatedAt,
    UpdatedAt,
}

pub type BlogQuery = TypedQuery<BlogField>;

impl QueryField for BlogField {
    const DEFAULT_SORT: Self = BlogField::CreatedAt;

    fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "content" => Some(Self::Content),
            "author" => Some(Self::Author),
            "category" => Some(Self::Category),
            "published" => Some(Self::Published),
            "views" => Some(Self::Views),
            "likes" => Some(Self::Likes),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    fn searchable() -> &'static [Self] {
        &[Self::Title, Self::Content, Self::Author, Self::Category]
    }

    fn filterable(&self) -> bool {
        matches!(
            self,
            Self::Title | Self::Author | Self::Category | Self::Published
        )
    }

    fn sortable(&self) -> bool {
        !matches!(self, Self::Content)
    }

    fn check_value(&self, value: &str) -> Result<(), String> {
        match self {
            Self::Published => value
                .parse::<bool>()
                .map(|_| ())
                .map_err(|_| "expected true or false".to_string()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ListQuery;
    use std::collections::HashMap;

    fn post(title: &str, category: &str) -> Blog {
        Blog::new(NewBlog {
            title: title.to_string(),
            content: "Slow-cooked and simple.".to_string(),
            author: "Chef Lin".to_string(),
            category: Some(category.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> BlogQuery {
        let params: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListQuery::from_params(&params, 6).resolve().unwrap()
    }

    #[test]
    fn test_new_applies_defaults() {
        let blog = post("  Ramen at home ", "Recipes");
        assert_eq!(blog.title, "Ramen at home");
        assert_eq!(blog.image, Blog::DEFAULT_IMAGE);
        assert!(blog.published);
        assert_eq!((blog.views, blog.likes), (0, 0));
    }

    #[test]
    fn test_new_requires_title_content_author() {
        let err = Blog::new(NewBlog {
            title: " ".to_string(),
            content: "x".to_string(),
            author: "y".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("title")));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let blog = post("Ramen at home", "Recipes");
        assert!(blog.matches(&query(&[("searchTerm", "RAMEN")])));
        assert!(blog.matches(&query(&[("searchTerm", "chef")])));
        assert!(!blog.matches(&query(&[("searchTerm", "sushi")])));
    }

    #[test]
    fn test_filters_intersect_with_search() {
        let blog = post("Ramen at home", "Recipes");
        assert!(blog.matches(&query(&[("searchTerm", "ramen"), ("category", "Recipes")])));
        assert!(!blog.matches(&query(&[("searchTerm", "ramen"), ("category", "News")])));
    }

    #[test]
    fn test_compare_by_multiple_keys() {
        let mut a = post("A", "X");
        let mut b = post("B", "X");
        a.likes = 3;
        b.likes = 3;
        a.views = 1;
        b.views = 9;
        let sort = [
            (BlogField::Likes, SortOrder::Desc),
            (BlogField::Views, SortOrder::Desc),
        ];
        assert_eq!(b.compare(&a, &sort), Ordering::Less);
    }

    #[test]
    fn test_apply_rejects_blank_title() {
        let mut blog = post("Ramen", "Recipes");
        let result = blog.apply(BlogPatch {
            title: Some("   ".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
