//! Blog handlers.

use std::collections::HashMap;

use actix_web::{HttpResponse, http::StatusCode, web};
use serde_json::Value;

use mealhub_core::domain::{BlogPatch, NewBlog, Role};
use mealhub_core::query::{ListQuery, project_fields};
use mealhub_core::services::BLOG_PAGE_SIZE;
use mealhub_shared::{ApiResponse, PageMeta};
use mealhub_shared::dto::{CreateBlogRequest, FeaturedQuery, UpdateBlogRequest};

use super::respond;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const EDITORS: [Role; 2] = [Role::Admin, Role::Provider];

/// GET /api/blogs and GET /api/blogs/all-blogs
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<HashMap<String, String>>,
) -> AppResult<HttpResponse> {
    let query = ListQuery::from_params(&params, BLOG_PAGE_SIZE);
    let page = state.blogs.list(&query).await?;

    let meta = PageMeta {
        page: page.page,
        limit: page.limit,
        total: page.total,
        total_page: page.total_pages(),
    };
    let items = page
        .items
        .iter()
        .map(|blog| {
            let value = serde_json::to_value(blog).map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(match &query.fields {
                Some(fields) => project_fields(value, fields),
                None => value,
            })
        })
        .collect::<AppResult<Vec<Value>>>()?;

    let body = ApiResponse::ok(StatusCode::OK.as_u16(), "Blogs retrieved successfully", items)
        .with_meta(meta);
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/blogs/featured
pub async fn featured(
    state: web::Data<AppState>,
    query: web::Query<FeaturedQuery>,
) -> AppResult<HttpResponse> {
    let blogs = state.blogs.featured(query.limit).await?;
    Ok(respond(
        StatusCode::OK,
        "Featured blogs retrieved successfully",
        blogs,
    ))
}

/// GET /api/blogs/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let detail = state.blogs.get(&path).await?;
    Ok(respond(StatusCode::OK, "Blog retrieved successfully", detail))
}

/// POST /api/blogs
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    identity.require_any(&EDITORS)?;
    let req = body.into_inner();
    req.validate()?;

    let blog = state
        .blogs
        .create(NewBlog {
            title: req.title.unwrap_or_default(),
            content: req.content.unwrap_or_default(),
            author: req.author.unwrap_or_default(),
            author_id: Some(identity.user_id),
            image: req.image,
            category: req.category,
            tags: req.tags,
            published: req.published,
        })
        .await?;
    tracing::info!(blog_id = %blog.id, user_id = %identity.user_id, "Blog created");

    Ok(respond(StatusCode::CREATED, "Blog created successfully", blog))
}

/// PATCH /api/blogs/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdateBlogRequest>,
) -> AppResult<HttpResponse> {
    identity.require_any(&EDITORS)?;
    let req = body.into_inner();
    req.validate()?;

    let blog = state
        .blogs
        .update(
            &path,
            BlogPatch {
                title: req.title,
                content: req.content,
                author: req.author,
                image: req.image,
                category: req.category,
                tags: req.tags,
                published: req.published,
            },
        )
        .await?;
    Ok(respond(StatusCode::OK, "Blog updated successfully", blog))
}

/// DELETE /api/blogs/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    identity.require_any(&[Role::Admin])?;
    let blog = state.blogs.delete(&path).await?;
    tracing::info!(blog_id = %blog.id, user_id = %identity.user_id, "Blog deleted");
    Ok(respond(StatusCode::OK, "Blog deleted successfully", blog))
}

/// POST /api/blogs/{id}/like
pub async fn like(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let blog = state.blogs.like(&path).await?;
    Ok(respond(StatusCode::OK, "Blog liked successfully", blog))
}
