//! Runs against a live Postgres: `DB_ADDRESS=... cargo test --features online`.
#![cfg(feature = "online")]

use blog_server::data::error::StoreError;
use blog_server::data::post_repository::{PostRepository, PostgresPostRepository};
use blog_server::domain::post::{DateKey, PartialDate, Post, PostDraft};
use blog_server::infrastructure::config::AppConfig;
use blog_server::infrastructure::database::{create_pool, run_migrations};
use chrono::{DateTime, Duration, FixedOffset};
use uuid::Uuid;

async fn repo() -> PostgresPostRepository {
    let config = AppConfig::from_env().expect("DB_ADDRESS must point at a test database");
    let pool = create_pool(&config).await.expect("database reachable");
    run_migrations(&pool).await.expect("migrations apply");
    PostgresPostRepository::new(pool)
}

// Tests share one table, so each claims a year of its own.
fn scratch_year() -> i32 {
    5000 + (Uuid::new_v4().as_u128() % 4000) as i32
}

fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2022-11-23T10:00:00+13:00").unwrap()
}

fn post(year: i32, month: i32, day: i32, content: &str) -> Post {
    Post::from_draft(
        PostDraft {
            title: "t".into(),
            content: content.into(),
            date: PartialDate::new(Some(year), Some(month), Some(day)),
            ..PostDraft::default()
        },
        now(),
    )
    .unwrap()
}

async fn cleanup(repo: &PostgresPostRepository, year: i32) {
    let filter = PartialDate::new(Some(year), None, None);
    for post in repo.find(&filter, 100).await.unwrap() {
        repo.delete(&post.key()).await.unwrap();
    }
}

#[tokio::test]
async fn ping_reaches_the_database() {
    repo().await.ping().await.unwrap();
}

#[tokio::test]
async fn insert_find_update_delete() {
    let repo = repo().await;
    let year = scratch_year();
    let original = post(year, 3, 20, "first");

    repo.insert(&original).await.unwrap();
    let found = repo
        .find(&PartialDate::from(original.key()), 10)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, original.id);
    assert_eq!(found[0].created_at, original.created_at);

    let mut edited = post(year, 3, 20, "second");
    edited.touch(now() + Duration::minutes(5));
    let stored = repo.update(&edited).await.unwrap().unwrap();
    assert_eq!(stored.id, original.id);
    assert_eq!(stored.content, "second");
    assert!(stored.updated_at > stored.created_at);

    assert_eq!(repo.delete(&original.key()).await.unwrap(), 1);
    assert_eq!(repo.delete(&original.key()).await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_date_and_id_are_told_apart() {
    let repo = repo().await;
    let year = scratch_year();
    let first = post(year, 1, 1, "c");
    repo.insert(&first).await.unwrap();

    let same_date = post(year, 1, 1, "other");
    assert!(matches!(
        repo.insert(&same_date).await,
        Err(StoreError::DuplicateDate(key)) if key == first.key()
    ));

    let mut same_id = post(year, 1, 2, "c");
    same_id.id = first.id;
    assert!(matches!(
        repo.insert(&same_id).await,
        Err(StoreError::DuplicateId(id)) if id == first.id
    ));

    cleanup(&repo, year).await;
}

#[tokio::test]
async fn nul_bytes_are_rejected_as_invalid_documents() {
    let repo = repo().await;
    let year = scratch_year();

    let err = repo.insert(&post(year, 2, 2, "nul\u{0}")).await.unwrap_err();

    assert!(matches!(err, StoreError::InvalidDocument(_)), "{err:?}");
    cleanup(&repo, year).await;
}

#[tokio::test]
async fn find_sorts_and_limits() {
    let repo = repo().await;
    let year = scratch_year();
    for (month, day) in [(12, 31), (1, 1), (6, 15)] {
        repo.insert(&post(year, month, day, "c")).await.unwrap();
    }

    let found = repo
        .find(&PartialDate::new(Some(year), None, None), 2)
        .await
        .unwrap();

    let keys: Vec<DateKey> = found.iter().map(Post::key).collect();
    assert_eq!(
        keys,
        [
            DateKey::new(year, 1, 1).unwrap(),
            DateKey::new(year, 6, 15).unwrap()
        ]
    );
    cleanup(&repo, year).await;
}
