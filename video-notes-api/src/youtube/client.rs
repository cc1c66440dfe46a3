use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{config::Config, Error, Result};

use super::{model::ListResponse, CommentThread, Video};

/// Read-through client for the YouTube Data API v3. No caching: every call is
/// a live request bounded by the configured timeout.
#[derive(Clone)]
pub struct YouTube {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    comments_max_results: u32,
}

impl YouTube {
    pub fn new(config: &Config) -> Result<Self> {
        if config.youtube_api_key().is_none() {
            tracing::warn!("YOUTUBE_API_KEY is not set, video metadata is unavailable");
        }

        Self::with_settings(
            config.youtube_api_url.clone(),
            config.youtube_api_key().map(String::from),
            config.upstream_timeout(),
            config.comments_max_results,
        )
    }

    pub fn with_settings(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
        comments_max_results: u32,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            comments_max_results,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn video(&self, video_id: &str) -> Result<Video> {
        let response: ListResponse<Video> = self
            .list(
                "videos",
                &[("part", "snippet,statistics,contentDetails"), ("id", video_id)],
            )
            .await?;

        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound("Video not found".into()))
    }

    #[tracing::instrument(skip(self))]
    pub async fn comment_threads(&self, video_id: &str) -> Result<Vec<CommentThread>> {
        let max_results = self.comments_max_results.to_string();
        let response: ListResponse<CommentThread> = self
            .list(
                "commentThreads",
                &[
                    ("part", "snippet,replies"),
                    ("videoId", video_id),
                    ("maxResults", max_results.as_str()),
                    ("order", "relevance"),
                ],
            )
            .await?;

        Ok(response.items)
    }

    async fn list<T: DeserializeOwned>(&self, resource: &str, query: &[(&str, &str)]) -> Result<ListResponse<T>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("YouTube API key not configured".into()))?;

        let response = self
            .client
            .get(format!("{}/{resource}", self.base_url))
            .query(query)
            .query(&[("key", api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, resource, "YouTube API error");
            return Err(Error::Upstream(format!("YouTube API error {status}")));
        }

        Ok(response.json().await?)
    }
}
