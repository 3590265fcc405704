use crate::data::error::StoreError;
use crate::domain::post::{DateKey, PartialDate, Post, PostId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";
const PRIMARY_KEY: &str = "posts_pkey";

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Posts matching every present segment of `filter`, ascending by date.
    async fn find(&self, filter: &PartialDate, limit: usize) -> Result<Vec<Post>, StoreError>;
    async fn insert(&self, post: &Post) -> Result<(), StoreError>;
    /// Overwrites title, content and updated_at of the post stored under
    /// `post.key()`. Returns the stored post, or `None` if the date is free.
    async fn update(&self, post: &Post) -> Result<Option<Post>, StoreError>;
    /// Returns the number of deleted posts.
    async fn delete(&self, key: &DateKey) -> Result<u64, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    year: i32,
    month: i32,
    day: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::from(row.id),
            title: row.title,
            content: row.content,
            year: row.year,
            month: row.month,
            day: row.day,
            created_at: row.created_at.fixed_offset(),
            updated_at: row.updated_at.fixed_offset(),
        }
    }
}

fn is_data_exception(code: Option<&str>) -> bool {
    code.is_some_and(|code| code.starts_with("22"))
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Database(db) if is_data_exception(db.code().as_deref()) => {
                StoreError::InvalidDocument(db.message().to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Unique violations are reported against the post being written.
fn write_error(err: sqlx::Error, post: &Post) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return match db.constraint() {
                Some(PRIMARY_KEY) => StoreError::DuplicateId(post.id),
                _ => StoreError::DuplicateDate(post.key()),
            };
        }
    }
    StoreError::from(err)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find(&self, filter: &PartialDate, limit: usize) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, year, month, day, created_at, updated_at
            FROM posts
            WHERE ($1::INT IS NULL OR year = $1)
              AND ($2::INT IS NULL OR month = $2)
              AND ($3::INT IS NULL OR day = $3)
            ORDER BY year, month, day
            LIMIT $4
            "#,
        )
        .bind(filter.year)
        .bind(filter.month)
        .bind(filter.day)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts for {}: {}", filter, e);
            StoreError::from(e)
        })?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn insert(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, year, month, day, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.id.as_uuid())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.year)
        .bind(post.month)
        .bind(post.day)
        .bind(post.created_at.with_timezone(&Utc))
        .bind(post.updated_at.with_timezone(&Utc))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post {}: {}", post.key(), e);
            write_error(e, post)
        })?;

        info!(post_id = %post.id, date = %post.key(), "post created");
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = $1, content = $2, updated_at = $3
            WHERE year = $4 AND month = $5 AND day = $6
            RETURNING id, title, content, year, month, day, created_at, updated_at
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.updated_at.with_timezone(&Utc))
        .bind(post.year)
        .bind(post.month)
        .bind(post.day)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", post.key(), e);
            StoreError::from(e)
        })?;

        if row.is_some() {
            info!(date = %post.key(), "post updated");
        }

        Ok(row.map(Post::from))
    }

    async fn delete(&self, key: &DateKey) -> Result<u64, StoreError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE year = $1 AND month = $2 AND day = $3")
            .bind(key.year)
            .bind(key.month)
            .bind(key.day)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", key, e);
                StoreError::from(e)
            })?
            .rows_affected();

        if deleted > 0 {
            info!(date = %key, "post deleted");
        }

        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_exceptions_are_sqlstate_class_22() {
        assert!(is_data_exception(Some("22021")));
        assert!(is_data_exception(Some("22003")));
        assert!(!is_data_exception(Some(UNIQUE_VIOLATION)));
        assert!(!is_data_exception(None));
    }

    #[test]
    fn pool_timeout_is_reported_as_timeout() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Timeout
        ));
    }

    #[test]
    fn other_driver_errors_are_backend_failures() {
        let err = StoreError::from(sqlx::Error::RowNotFound);

        assert!(matches!(err, StoreError::Backend(_)));
    }
}
