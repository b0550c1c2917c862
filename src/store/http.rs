//! HTTP [`Store`] implementation backed by reqwest.
//!
//! Normalizes every transport failure into [`SyncError::Transport`]: the
//! response body text is surfaced verbatim when the store provided one,
//! otherwise the canonical status reason. The request timeout comes from
//! `[store].timeout_secs`; no additional timeout or retry is layered on
//! top.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Response, StatusCode};
use std::time::Duration;

use crate::config::StoreConfig;
use crate::error::SyncError;
use crate::models::Item;

use super::{CreateRequest, Store, TagRequest};

/// Characters escaped when a key or tag is embedded as a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Typed client for the tagged key-value REST contract.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn encode(segment: &str) -> String {
        utf8_percent_encode(segment, PATH_SEGMENT).to_string()
    }

    /// Map a non-2xx response to a transport error carrying the body text.
    async fn check(response: Response) -> Result<Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status_reason(status)
        } else {
            body.trim().to_string()
        };

        Err(SyncError::transport(Some(status.as_u16()), message))
    }
}

fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[async_trait]
impl Store for HttpStore {
    async fn search(&self, tags: &[String]) -> Result<Vec<Item>, SyncError> {
        let mut request = self.client.get(self.url("api/keys"));
        if !tags.is_empty() {
            request = request.query(&[("tags", tags.join(","))]);
        }

        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, key: &str, value: &str) -> Result<Item, SyncError> {
        let response = self
            .client
            .post(self.url("api/keys"))
            .json(&CreateRequest { key, value })
            .send()
            .await?;
        let response = Self::check(response).await?;

        // Some store versions echo the created item, others return an
        // empty body. Fall back to the locally constructed projection.
        let body = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| Item::new(key, value)))
    }

    async fn add_tag(&self, key: &str, tag: &str) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.url("api/tags"))
            .json(&TagRequest { key, tag })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn remove_tag(&self, key: &str, tag: &str) -> Result<(), SyncError> {
        let path = format!("api/tags/{}/{}", Self::encode(tag), Self::encode(key));
        let response = self.client.delete(self.url(&path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SyncError> {
        let path = format!("api/keys/{}", Self::encode(key));
        let response = self.client.delete(self.url(&path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
