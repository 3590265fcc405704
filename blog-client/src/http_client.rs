use crate::error::BlogClientError;
use crate::models::{DateSelector, HelloResponse, NewPost, Post};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct BlogClientHttp {
    client: Client,
    base_url: Url,
}

impl BlogClientHttp {
    pub async fn connect(endpoint: &str) -> Result<Self, BlogClientError> {
        let base_url = Url::parse(endpoint)
            .map_err(|err| BlogClientError::InvalidEndpoint(format!("{endpoint}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BlogClientError::InvalidEndpoint(endpoint.to_string()));
        }

        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    // Segments are percent-encoded; the endpoint may carry a path prefix.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn hello(&self, name: &str) -> Result<String, BlogClientError> {
        let resp = self.client.get(self.url(&["hello", name])).send().await?;
        let hello: HelloResponse = json_or_error(resp).await?;
        Ok(hello.message)
    }

    pub async fn ping(&self) -> Result<(), BlogClientError> {
        let resp = self.client.get(self.url(&["ping"])).send().await?;
        success_or_error(resp).await.map(drop)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, BlogClientError> {
        let resp = self.client.get(self.url(&["posts"])).send().await?;
        json_or_error(resp).await
    }

    /// Posts matching every given segment; `None` matches any value.
    pub async fn posts_by_date(
        &self,
        year: Option<i32>,
        month: Option<i32>,
        day: Option<i32>,
    ) -> Result<Vec<Post>, BlogClientError> {
        let (year, month, day) = (segment(year), segment(month), segment(day));
        let resp = self
            .client
            .get(self.url(&["posts", &year, &month, &day]))
            .send()
            .await?;
        json_or_error(resp).await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post, BlogClientError> {
        let resp = self
            .client
            .post(self.url(&["new"]))
            .json(post)
            .send()
            .await?;
        json_or_error(resp).await
    }

    /// Replaces title and content of the post stored under the date of `post`.
    pub async fn update_post(&self, post: &NewPost) -> Result<Post, BlogClientError> {
        let resp = self
            .client
            .put(self.url(&["edit"]))
            .json(post)
            .send()
            .await?;
        json_or_error(resp).await
    }

    pub async fn delete_post(
        &self,
        year: Option<i32>,
        month: Option<i32>,
        day: Option<i32>,
    ) -> Result<(), BlogClientError> {
        let resp = self
            .client
            .delete(self.url(&["delete"]))
            .json(&DateSelector { year, month, day })
            .send()
            .await?;
        success_or_error(resp).await.map(drop)
    }
}

fn segment(value: Option<i32>) -> String {
    value.unwrap_or(0).to_string()
}

async fn success_or_error(resp: Response) -> Result<Response, BlogClientError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(BlogClientError::from_http_response(resp).await)
    }
}

async fn json_or_error<T: DeserializeOwned>(resp: Response) -> Result<T, BlogClientError> {
    Ok(success_or_error(resp).await?.json().await?)
}
