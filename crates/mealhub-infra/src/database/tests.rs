use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use mealhub_core::domain::{Blog, BlogQuery, NewsletterSubscription};
use mealhub_core::error::RepoError;
use mealhub_core::ports::{BaseRepository, BlogRepository, NewsletterRepository};
use mealhub_core::query::ListQuery;

use crate::database::entity::{blog, newsletter};
use crate::database::postgres_repo::{PostgresBlogRepository, PostgresNewsletterRepository};

fn blog_model(id: Uuid, title: &str, views: i64) -> blog::Model {
    let now = Utc::now();
    blog::Model {
        id,
        title: title.to_owned(),
        content: "Content".to_owned(),
        author: "Chef Lin".to_owned(),
        author_id: None,
        image: Blog::DEFAULT_IMAGE.to_owned(),
        category: "Recipes".to_owned(),
        tags: serde_json::json!(["noodles", "soup"]),
        published: true,
        views,
        likes: 0,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn count_row(n: i64) -> BTreeMap<String, Value> {
    BTreeMap::from([("num_items".to_owned(), Value::BigInt(Some(n)))])
}

fn blog_query(pairs: &[(&str, &str)]) -> BlogQuery {
    let params: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ListQuery::from_params(&params, 6).resolve().unwrap()
}

#[tokio::test]
async fn test_find_blog_by_id() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![blog_model(id, "Ramen at home", 3)]])
        .into_connection();

    let repo = PostgresBlogRepository::new(db);
    let blog: Blog = repo.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(blog.id, id);
    assert_eq!(blog.title, "Ramen at home");
    assert_eq!(blog.tags, vec!["noodles", "soup"]);
}

#[tokio::test]
async fn test_list_blogs_counts_then_pages() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(7)]])
        .append_query_results([vec![
            blog_model(Uuid::new_v4(), "Ramen", 1),
            blog_model(Uuid::new_v4(), "Pho", 2),
        ]])
        .into_connection();

    let repo = PostgresBlogRepository::new(db);
    let page = repo
        .list(&blog_query(&[("searchTerm", "soup"), ("page", "2"), ("limit", "2")]))
        .await
        .unwrap();

    assert_eq!(page.total, 7);
    assert_eq!(page.page, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages(), 4);
}

#[tokio::test]
async fn test_search_term_is_matched_literally() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(0)]])
            .append_query_results([Vec::<blog::Model>::new()])
            .into_connection(),
    );

    let repo = PostgresBlogRepository::new(db.clone());
    let page = repo
        .list(&blog_query(&[("searchTerm", "50%_OFF")]))
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    drop(repo);

    let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
    let count_sql = format!("{:?}", log[0]);
    assert!(count_sql.contains("ESCAPE"), "{count_sql}");
    assert!(count_sql.contains(r#""%50\%\_off%""#), "{count_sql}");
}

#[tokio::test]
async fn test_repositories_share_one_connection() {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![blog_model(id, "Ramen", 0)]])
            .append_query_results([vec![newsletter::Model {
                id: Uuid::new_v4(),
                email: "lin@example.com".to_owned(),
                is_subscribed: true,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection(),
    );

    let blogs = PostgresBlogRepository::new(db.clone());
    let subscriptions = PostgresNewsletterRepository::new(db);

    let blog: Option<Blog> = blogs.find_by_id(id).await.unwrap();
    assert!(blog.is_some());
    let found = subscriptions.find_by_email("lin@example.com").await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn test_increment_views_returns_updated_row() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .append_query_results([vec![blog_model(id, "Ramen", 4)]])
        .into_connection();

    let repo = PostgresBlogRepository::new(db);
    let blog = repo.increment_views(id).await.unwrap().unwrap();
    assert_eq!(blog.views, 4);
}

#[tokio::test]
async fn test_increment_missing_blog_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresBlogRepository::new(db);
    assert!(repo.increment_likes(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresBlogRepository::new(db);
    let result = BaseRepository::<Blog, Uuid>::delete(&repo, Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_subscription_by_email() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![newsletter::Model {
            id: Uuid::new_v4(),
            email: "lin@example.com".to_owned(),
            is_subscribed: false,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresNewsletterRepository::new(db);
    let found: NewsletterSubscription = repo
        .find_by_email("lin@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!found.is_subscribed);
}
