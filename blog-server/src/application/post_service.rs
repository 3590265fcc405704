use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, SubsecRound};
use tracing::instrument;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{DateKey, PartialDate, Post, PostDraft};
use crate::infrastructure::clock::Clock;

/// Upper bound on posts returned by any lookup.
pub const MAX_RESULTS: usize = 10;

pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now().trunc_subsecs(0)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Posts whose present date segments all match, oldest first.
    ///
    /// An empty filter is not rejected: it lists everything, capped like any
    /// other lookup. No match at all is reported as `PostsNotFound`.
    #[instrument(skip(self), fields(filter = %filter))]
    pub async fn find_by_date(&self, filter: PartialDate) -> Result<Vec<Post>, DomainError> {
        let posts = self.repo.find(&filter, MAX_RESULTS).await?;
        if posts.is_empty() {
            return Err(DomainError::PostsNotFound(filter));
        }
        Ok(posts)
    }

    pub async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        let posts = self.repo.find(&PartialDate::default(), MAX_RESULTS).await?;
        Ok(posts)
    }

    #[instrument(skip(self, draft), fields(date = %draft.date))]
    pub async fn create(&self, draft: PostDraft) -> Result<Post, DomainError> {
        let post = Post::from_draft(draft, self.now())?;
        self.repo.insert(&post).await?;
        Ok(post)
    }

    #[instrument(skip(self, draft), fields(date = %draft.date))]
    pub async fn update(&self, draft: PostDraft) -> Result<Post, DomainError> {
        let now = self.now();
        let mut post = Post::from_draft(draft, now)?;
        post.touch(now);
        let key = post.key();

        self.repo
            .update(&post)
            .await?
            .ok_or(DomainError::PostNotFound(key))
    }

    #[instrument(skip(self), fields(date = %key))]
    pub async fn delete(&self, key: DateKey) -> Result<(), DomainError> {
        match self.repo.delete(&key).await? {
            1 => Ok(()),
            _ => Err(DomainError::PostNotFound(key)),
        }
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.repo.ping().await.map_err(DomainError::from)
    }
}
