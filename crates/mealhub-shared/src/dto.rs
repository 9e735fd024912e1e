//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields the API requires are still `Option` here so a missing field
//! is reported through `validate()` with a field-level error source instead of
//! a generic body-parse failure.

use serde::{Deserialize, Serialize};

use crate::response::ErrorSource;

fn require(sources: &mut Vec<ErrorSource>, path: &str, value: &Option<String>, message: &str) {
    if value.as_deref().map(str::trim).unwrap_or_default().is_empty() {
        sources.push(ErrorSource::new(path, message));
    }
}

fn reject_blank(sources: &mut Vec<ErrorSource>, path: &str, value: &Option<String>) {
    if matches!(value.as_deref().map(str::trim), Some("")) {
        sources.push(ErrorSource::new(path, format!("{path} cannot be empty")));
    }
}

fn finish(sources: Vec<ErrorSource>) -> Result<(), Vec<ErrorSource>> {
    if sources.is_empty() {
        Ok(())
    } else {
        Err(sources)
    }
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl RegisterUserRequest {
    pub fn validate(&self) -> Result<(), Vec<ErrorSource>> {
        let mut sources = Vec::new();
        require(&mut sources, "name", &self.name, "Name is required");
        require(&mut sources, "email", &self.email, "Email is required");
        require(&mut sources, "password", &self.password, "Password is required");
        finish(sources)
    }
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Body of `POST /blogs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

impl CreateBlogRequest {
    pub fn validate(&self) -> Result<(), Vec<ErrorSource>> {
        let mut sources = Vec::new();
        require(&mut sources, "title", &self.title, "Title is required");
        require(&mut sources, "content", &self.content, "Content is required");
        require(&mut sources, "author", &self.author, "Author is required");
        finish(sources)
    }
}

/// Body of `PATCH /blogs/{id}`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

impl UpdateBlogRequest {
    pub fn validate(&self) -> Result<(), Vec<ErrorSource>> {
        let mut sources = Vec::new();
        reject_blank(&mut sources, "title", &self.title);
        reject_blank(&mut sources, "content", &self.content);
        reject_blank(&mut sources, "author", &self.author);
        finish(sources)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

impl SubscribeRequest {
    pub fn validate(&self) -> Result<(), Vec<ErrorSource>> {
        let mut sources = Vec::new();
        require(&mut sources, "email", &self.email, "Email is required");
        finish(sources)
    }
}

/// Query string of `GET /newsletter/all`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionFilter {
    pub is_subscribed: Option<bool>,
}

/// Query string of `GET /blogs/featured`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<u64>,
}

/// Body of `PATCH /user/{id}`: profile fields plus the current password.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub password: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Body of `PATCH /user/admin/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}
