//! In-memory post store, used by tests and as a stand-in for Postgres.
//!
//! Enforces the same rules as the `posts` table: one post per date, unique
//! ids, and no NUL bytes in text columns.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::data::error::StoreError;
use crate::data::post_repository::PostRepository;
use crate::domain::post::{DateKey, PartialDate, Post};

pub struct InMemoryPostRepository {
    // keyed by date so iteration is already in (year, month, day) order
    posts: RwLock<BTreeMap<DateKey, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    fn check_document(post: &Post) -> Result<(), StoreError> {
        if post.title.contains('\0') || post.content.contains('\0') {
            return Err(StoreError::InvalidDocument(
                "text fields must not contain NUL bytes".into(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find(&self, filter: &PartialDate, limit: usize) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        Ok(posts
            .values()
            .filter(|post| filter.matches(&post.key()))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert(&self, post: &Post) -> Result<(), StoreError> {
        Self::check_document(post)?;
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.key()) {
            return Err(StoreError::DuplicateDate(post.key()));
        }
        if posts.values().any(|existing| existing.id == post.id) {
            return Err(StoreError::DuplicateId(post.id));
        }
        posts.insert(post.key(), post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, StoreError> {
        Self::check_document(post)?;
        let mut posts = self.posts.write().await;
        Ok(posts.get_mut(&post.key()).map(|stored| {
            stored.title = post.title.clone();
            stored.content = post.content.clone();
            stored.updated_at = post.updated_at;
            stored.clone()
        }))
    }

    async fn delete(&self, key: &DateKey) -> Result<u64, StoreError> {
        let mut posts = self.posts.write().await;
        Ok(posts.remove(key).map_or(0, |_| 1))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
