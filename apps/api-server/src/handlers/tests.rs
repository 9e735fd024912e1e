use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use mealhub_core::domain::{NewUser, Role, User};
use mealhub_core::ports::{BaseRepository, TokenService};
use mealhub_infra::{InMemoryUserRepository, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::middleware::error::route_not_found;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::AppState;

fn tokens() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "mealhub-test".to_string(),
    }))
}

macro_rules! test_app {
    ($tokens:expr, $users:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(AppState::in_memory_with_users(
                    $users.clone(),
                )))
                .app_data(web::Data::new($tokens.clone()))
                .configure(configure_routes)
                .default_service(web::to(route_not_found)),
        )
        .await
    };
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Seed an account with `role` and issue a token for it.
async fn token_for(
    tokens: &Arc<dyn TokenService>,
    users: &InMemoryUserRepository,
    role: &str,
) -> String {
    let user = users
        .insert(User::new(NewUser {
            name: format!("Test {role}"),
            email: format!("{}-{role}@example.com", Uuid::new_v4().simple()),
            password_hash: "unused".to_string(),
            role: role.parse::<Role>().unwrap(),
        }))
        .await
        .unwrap();
    tokens
        .generate_token(user.id, &user.email, vec![role.to_string()])
        .unwrap()
}

/// Register through the API and return the issued token and user id.
macro_rules! register {
    ($app:expr, $email:expr, $role:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Lin",
                "email": $email,
                "password": "tomato-soup-42",
                "role": $role,
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        assert_eq!(body["statusCode"], 201, "{body}");
        (
            body["data"]["accessToken"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }};
}

#[actix_web::test]
async fn test_health_check_and_request_id() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((REQUEST_ID_HEADER, "req-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-123");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[actix_web::test]
async fn test_unknown_route_is_enveloped_404() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);

    let req = test::TestRequest::get().uri("/api/nope").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);
}

#[actix_web::test]
async fn test_blog_create_requires_editor_role() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);
    let payload = json!({"title": "Ramen", "content": "Broth first.", "author": "Lin"});

    let anonymous = test::TestRequest::post()
        .uri("/api/blogs")
        .set_json(&payload)
        .to_request();
    assert_eq!(
        test::call_service(&app, anonymous).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let customer = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(&token_for(&tokens, &users, "customer").await))
        .set_json(&payload)
        .to_request();
    assert_eq!(
        test::call_service(&app, customer).await.status(),
        StatusCode::FORBIDDEN
    );

    let provider = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(&token_for(&tokens, &users, "provider").await))
        .set_json(&payload)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, provider).await;
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["data"]["category"], "General");
}

#[actix_web::test]
async fn test_blog_create_reports_missing_fields() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(&token_for(&tokens, &users, "admin").await))
        .set_json(json!({"title": "Only a title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errorSources"][0]["path"], "content");
    assert_eq!(body["errorSources"][1]["path"], "author");
}

#[actix_web::test]
async fn test_blog_get_ids_and_view_counter() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);

    let malformed = test::TestRequest::get().uri("/api/blogs/42").to_request();
    let resp = test::call_service(&app, malformed).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid blog ID format");

    let absent = test::TestRequest::get()
        .uri(&format!("/api/blogs/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, absent).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Blog not found");

    let create = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(&token_for(&tokens, &users, "admin").await))
        .set_json(json!({"title": "Ramen", "content": "Broth first.", "author": "Lin"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, create).await;
    let uri = format!("/api/blogs/{}", created["data"]["id"].as_str().unwrap());

    for expected in 1..=2 {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["views"], expected);
    }
}

#[actix_web::test]
async fn test_blog_list_meta_and_projection() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);
    let admin = token_for(&tokens, &users, "admin").await;

    for i in 0..8 {
        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "title": format!("Post {i}"),
                "content": "Body",
                "author": "Lin",
                "published": i != 0,
            }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/blogs/all-blogs?page=2&fields=title")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body["meta"],
        json!({"page": 2, "limit": 6, "total": 7, "totalPage": 2})
    );
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].get("title").is_some());
    assert!(items[0].get("id").is_some());
    assert!(items[0].get("content").is_none());

    let req = test::TestRequest::get()
        .uri("/api/blogs?page=1000000000000000000&limit=100")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Page is out of range");
}

#[actix_web::test]
async fn test_malformed_json_is_enveloped_400() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);

    let req = test::TestRequest::post()
        .uri("/api/newsletter/subscribe")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_newsletter_flow() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/newsletter/subscribe")
            .set_json(json!({"email": "Lin@Example.com"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["isSubscribed"], true);
        ids.push(body["data"]["id"].clone());
    }
    assert_eq!(ids[0], ids[1]);

    let unknown = test::TestRequest::get()
        .uri("/api/newsletter/unsubscribe/nobody@example.com")
        .to_request();
    assert_eq!(
        test::call_service(&app, unknown).await.status(),
        StatusCode::NOT_FOUND
    );

    let anonymous = test::TestRequest::get().uri("/api/newsletter/all").to_request();
    assert_eq!(
        test::call_service(&app, anonymous).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let unsubscribe = test::TestRequest::get()
        .uri("/api/newsletter/unsubscribe/lin@example.com")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, unsubscribe).await;
    assert_eq!(body["data"]["isSubscribed"], false);

    let admin = token_for(&tokens, &users, "admin").await;
    let active = test::TestRequest::get()
        .uri("/api/newsletter/all")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, active).await;
    assert_eq!(body["data"], json!([]));

    let inactive = test::TestRequest::get()
        .uri("/api/newsletter/all?isSubscribed=false")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, inactive).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);
    let (_, user_id) = register!(app, "lin@example.com", "provider");

    let login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "lin@example.com", "password": "tomato-soup-42"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, login).await;
    assert_eq!(body["data"]["tokenType"], "Bearer");
    let token = body["data"]["accessToken"].as_str().unwrap().to_string();

    // Bare token, as older clients send it.
    let me = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, me).await;
    assert_eq!(body["data"]["id"], user_id);
    assert_eq!(body["data"]["role"], "provider");
    assert!(body["data"].get("passwordHash").is_none());

    let wrong = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "lin@example.com", "password": "nope-nope"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, wrong).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_duplicate_registration_is_conflict() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);
    register!(app, "lin@example.com", "customer");

    let again = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Lin",
            "email": "lin@example.com",
            "password": "tomato-soup-42",
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, again).await.status(),
        StatusCode::CONFLICT
    );
}

#[actix_web::test]
async fn test_user_routes_enforce_ownership() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);
    let (lin_token, lin_id) = register!(app, "lin@example.com", "customer");
    let (_, kai_id) = register!(app, "kai@example.com", "customer");

    let other = test::TestRequest::get()
        .uri(&format!("/api/user/{kai_id}"))
        .insert_header(bearer(&lin_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, other).await.status(),
        StatusCode::FORBIDDEN
    );

    let update = test::TestRequest::patch()
        .uri(&format!("/api/user/{lin_id}"))
        .insert_header(bearer(&lin_token))
        .set_json(json!({"password": "tomato-soup-42", "phone": "555-0101"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, update).await;
    assert_eq!(body["data"]["phone"], "555-0101");

    let list = test::TestRequest::get()
        .uri("/api/user")
        .insert_header(bearer(&lin_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, list).await.status(),
        StatusCode::FORBIDDEN
    );

    let admin_list = test::TestRequest::get()
        .uri("/api/user")
        .insert_header(bearer(&token_for(&tokens, &users, "admin").await))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, admin_list).await;
    // the two registered customers plus the seeded admin
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn test_stale_tokens_follow_the_stored_account() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);
    let admin = token_for(&tokens, &users, "admin").await;
    let (provider_token, provider_id) = register!(app, "chef@example.com", "provider");
    let payload = json!({"title": "Ramen", "content": "Broth first.", "author": "Lin"});

    let demote = test::TestRequest::patch()
        .uri(&format!("/api/user/admin/{provider_id}"))
        .insert_header(bearer(&admin))
        .set_json(json!({"role": "customer"}))
        .to_request();
    assert_eq!(test::call_service(&app, demote).await.status(), StatusCode::OK);

    let create = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(bearer(&provider_token))
        .set_json(&payload)
        .to_request();
    assert_eq!(
        test::call_service(&app, create).await.status(),
        StatusCode::FORBIDDEN
    );

    let delete = test::TestRequest::delete()
        .uri(&format!("/api/user/{provider_id}"))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::OK);

    let me = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&provider_token))
        .to_request();
    let resp = test::call_service(&app, me).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User no longer exists");
}

#[actix_web::test]
async fn test_dashboards_check_roles() {
    let tokens = tokens();
    let users = Arc::new(InMemoryUserRepository::new());
    let app = test_app!(tokens, users);

    let wrong_role = test::TestRequest::get()
        .uri("/api/user/provider/dashboard-stats")
        .insert_header(bearer(&token_for(&tokens, &users, "customer").await))
        .to_request();
    assert_eq!(
        test::call_service(&app, wrong_role).await.status(),
        StatusCode::FORBIDDEN
    );

    let provider = test::TestRequest::get()
        .uri("/api/user/provider/dashboard-stats")
        .insert_header(bearer(&token_for(&tokens, &users, "provider").await))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, provider).await;
    assert_eq!(body["data"]["totalMeals"], 0);
    assert_eq!(body["data"]["ratingStats"]["averageRating"], Value::Null);

    let customer = test::TestRequest::get()
        .uri("/api/customer/dashboard-stats")
        .insert_header(bearer(&token_for(&tokens, &users, "customer").await))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, customer).await;
    assert_eq!(body["data"]["totalOrders"], 0);
}
