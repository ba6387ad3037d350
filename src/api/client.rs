use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::error::{GalleryError, Result};
use crate::models::{MediaQuery, MediaRecord};

/// `GET /api/media` body. Pairs keep the server's ordering.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaListResponse {
    pub data: Vec<(String, MediaRecord)>,
}

/// `GET /api/tags` body.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Body of every mutating endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Client for the gallery endpoints.
///
/// Tag lists are cached in memory per URL; any successful tag mutation drops
/// the whole cache.
pub struct GalleryClient<T> {
    transport: T,
    base_url: String,
    tag_cache: HashMap<String, Vec<String>>,
}

impl<T: Transport> GalleryClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tag_cache: HashMap::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn thumbnail_url(&self, hash: &str) -> String {
        super::thumbnail_url(&self.base_url, hash)
    }

    pub fn original_url(&self, hash: &str) -> String {
        super::original_url(&self.base_url, hash)
    }

    /// Fetches the media list for `query`, in server order.
    pub async fn fetch_media(&self, query: &MediaQuery) -> Result<Vec<(String, MediaRecord)>> {
        let mut path = "/api/media".to_string();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.to_query_string());
        }
        let resp: MediaListResponse = self.get_json(&path).await?;
        debug!("Fetched {} media records for {:?}", resp.data.len(), path);
        Ok(resp.data)
    }

    /// Every tag known to the server.
    pub async fn fetch_all_tags(&mut self) -> Result<Vec<String>> {
        self.fetch_tags_cached("/api/tags".to_string()).await
    }

    /// Tags attached to one media item.
    pub async fn fetch_tags_for(&mut self, hash: &str) -> Result<Vec<String>> {
        self.fetch_tags_cached(format!("/api/tags?hash={hash}")).await
    }

    async fn fetch_tags_cached(&mut self, path: String) -> Result<Vec<String>> {
        if let Some(tags) = self.tag_cache.get(&path) {
            return Ok(tags.clone());
        }
        let resp: TagsResponse = self.get_json(&path).await?;
        if !resp.success {
            return Err(GalleryError::Api(
                resp.msg
                    .unwrap_or_else(|| format!("failed to get tags from {path}")),
            ));
        }
        self.tag_cache.insert(path, resp.data.clone());
        Ok(resp.data)
    }

    pub fn clear_tag_cache(&mut self) {
        self.tag_cache.clear();
    }

    /// Attaches every tag to every hash.
    pub async fn add_tags(&mut self, tags: &[String], hashes: &[String]) -> Result<String> {
        let body = json!({ "tag": tags, "hashes": hashes });
        self.mutate_tags(Method::Post, body).await
    }

    pub async fn rename_tag(&mut self, old_tag: &str, new_tag: &str) -> Result<String> {
        let body = json!({ "old_tag": old_tag, "new_tag": new_tag });
        self.mutate_tags(Method::Put, body).await
    }

    /// Deletes tags from the whole library.
    pub async fn delete_tags(&mut self, tags: &[String]) -> Result<String> {
        let body = json!({ "tags": tags });
        self.mutate_tags(Method::Delete, body).await
    }

    /// Detaches tags from specific media only.
    pub async fn remove_tags_from(&mut self, tags: &[String], hashes: &[String]) -> Result<String> {
        let body = json!({ "tags": tags, "hashes": hashes });
        self.mutate_tags(Method::Delete, body).await
    }

    async fn mutate_tags(&mut self, method: Method, body: serde_json::Value) -> Result<String> {
        let msg = self.mutate(method, "/api/tags", Some(body)).await?;
        self.clear_tag_cache();
        Ok(msg)
    }

    /// Rotates one item a quarter turn on the server.
    pub async fn rotate(&self, hash: &str, clockwise: bool) -> Result<String> {
        let direction = if clockwise { "right" } else { "left" };
        self.mutate(Method::Post, &format!("/api/rotate/{hash}/{direction}"), None)
            .await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = self.url(path);
        let resp = self
            .transport
            .send(HttpRequest {
                method: Method::Get,
                url: url.clone(),
                body: None,
            })
            .await?;
        if !resp.is_success() {
            return Err(GalleryError::Status {
                status: resp.status,
                url,
            });
        }
        Ok(serde_json::from_str(&resp.body)?)
    }

    async fn mutate(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String> {
        let url = self.url(path);
        let resp = self
            .transport
            .send(HttpRequest {
                method,
                url: url.clone(),
                body,
            })
            .await?;
        interpret_mutation(resp, url)
    }
}

/// A mutation succeeded only when both the status and the body say so. The
/// server's message is preferred over the bare status when it has one.
fn interpret_mutation(resp: HttpResponse, url: String) -> Result<String> {
    match serde_json::from_str::<MutationResponse>(&resp.body) {
        Ok(body) if body.success && resp.is_success() => Ok(body.msg.unwrap_or_default()),
        Ok(body) => {
            let msg = body
                .msg
                .unwrap_or_else(|| format!("server returned HTTP {}", resp.status));
            warn!(status = resp.status, %url, "Mutation rejected: {}", msg);
            Err(GalleryError::Api(msg))
        }
        Err(_) if !resp.is_success() => Err(GalleryError::Status {
            status: resp.status,
            url,
        }),
        Err(err) => Err(err.into()),
    }
}
