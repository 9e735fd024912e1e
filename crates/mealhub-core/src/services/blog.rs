use std::sync::Arc;

use crate::domain::{AuthorSummary, Blog, BlogDetail, BlogField, BlogPatch, NewBlog};
use crate::error::DomainError;
use crate::ports::{BlogRepository, UserRepository};
use crate::query::{ListQuery, Page};

use super::parse_id;

/// Default page size of the public blog listing.
pub const BLOG_PAGE_SIZE: u64 = 6;

/// Default number of featured posts.
pub const FEATURED_LIMIT: u64 = 3;

const ENTITY: &str = "Blog";

#[derive(Clone)]
pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(blogs: Arc<dyn BlogRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { blogs, users }
    }

    pub async fn create(&self, input: NewBlog) -> Result<Blog, DomainError> {
        let blog = Blog::new(input)?;
        Ok(self.blogs.insert(blog).await?)
    }

    /// Published posts only. Search, filters, sort and paging come from the query.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Blog>, DomainError> {
        let query = query
            .resolve::<BlogField>()?
            .with_filter(BlogField::Published, "true");
        Ok(self.blogs.list(&query).await?)
    }

    pub async fn featured(&self, limit: Option<u64>) -> Result<Vec<Blog>, DomainError> {
        let limit = limit.filter(|&l| l > 0).unwrap_or(FEATURED_LIMIT);
        Ok(self.blogs.featured(limit).await?)
    }

    /// Fetch a post, counting the read as one view.
    pub async fn get(&self, id: &str) -> Result<BlogDetail, DomainError> {
        let id = parse_id(ENTITY, id)?;
        let blog = self
            .blogs
            .increment_views(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;

        let author_profile = match blog.author_id {
            Some(author_id) => self
                .users
                .find_by_id(author_id)
                .await?
                .map(|user| AuthorSummary {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                }),
            None => None,
        };

        Ok(BlogDetail {
            blog,
            author_profile,
        })
    }

    pub async fn update(&self, id: &str, patch: BlogPatch) -> Result<Blog, DomainError> {
        let id = parse_id(ENTITY, id)?;
        let mut blog = self
            .blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;

        blog.apply(patch)?;
        Ok(self.blogs.update(blog).await?)
    }

    /// Hard delete. Returns the removed post.
    pub async fn delete(&self, id: &str) -> Result<Blog, DomainError> {
        let id = parse_id(ENTITY, id)?;
        let blog = self
            .blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;

        self.blogs.delete(id).await?;
        Ok(blog)
    }

    pub async fn like(&self, id: &str) -> Result<Blog, DomainError> {
        let id = parse_id(ENTITY, id)?;
        self.blogs
            .increment_likes(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }
}
