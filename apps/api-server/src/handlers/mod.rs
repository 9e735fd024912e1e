//! HTTP handlers and route configuration.

mod auth;
mod blog;
mod dashboard;
mod health;
mod newsletter;
mod user;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use mealhub_core::domain::User;
use mealhub_shared::ApiResponse;
use mealhub_shared::dto::UserResponse;

use crate::middleware::error::{json_error_handler, path_error_handler, query_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                .service(
                    web::scope("/blogs")
                        .route("", web::get().to(blog::list))
                        .route("", web::post().to(blog::create))
                        .route("/all-blogs", web::get().to(blog::list))
                        .route("/featured", web::get().to(blog::featured))
                        .route("/{id}", web::get().to(blog::get))
                        .route("/{id}", web::patch().to(blog::update))
                        .route("/{id}", web::delete().to(blog::delete))
                        .route("/{id}/like", web::post().to(blog::like)),
                )
                .service(
                    web::scope("/newsletter")
                        .route("/subscribe", web::post().to(newsletter::subscribe))
                        .route("/unsubscribe/{email}", web::get().to(newsletter::unsubscribe))
                        .route("/all", web::get().to(newsletter::list)),
                )
                .service(
                    web::scope("/user")
                        .route("", web::get().to(user::list))
                        .route(
                            "/provider/dashboard-stats",
                            web::get().to(dashboard::provider_stats),
                        )
                        .route("/change-password/{id}", web::patch().to(user::change_password))
                        .route("/admin/{id}", web::patch().to(user::admin_update))
                        .route("/{id}", web::get().to(user::get))
                        .route("/{id}", web::patch().to(user::update_profile))
                        .route("/{id}", web::delete().to(user::delete)),
                )
                .service(
                    web::scope("/customer")
                        .route("/dashboard-stats", web::get().to(dashboard::customer_stats)),
                ),
        );
}

/// Wrap `data` in a success envelope.
pub(crate) fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::ok(status.as_u16(), message, data))
}

/// Public view of a user. The password hash never leaves the server.
pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
        phone: user.phone.clone(),
        address: user.address.clone(),
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests;
