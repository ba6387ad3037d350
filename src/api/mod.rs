//! Typed access to the gallery server's JSON endpoints.
//!
//! The crate does not ship an HTTP stack; a [`Transport`] supplied by the
//! embedding application moves bytes, and [`GalleryClient`] owns URLs, payload
//! shapes, decoding and the tag cache.

mod client;

pub use client::{GalleryClient, MediaListResponse, MutationResponse, TagsResponse};

use serde_json::Value;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// URL of the grid-sized rendition of one item.
pub fn thumbnail_url(base_url: &str, hash: &str) -> String {
    format!("{}/media/{hash}/thumbnail", base_url.trim_end_matches('/'))
}

/// URL of the full-size bytes of one item.
pub fn original_url(base_url: &str, hash: &str) -> String {
    format!("{}/media/{hash}/original", base_url.trim_end_matches('/'))
}

/// Moves one request to the server and returns the raw response.
///
/// Network failures map to [`crate::GalleryError::Transport`]; HTTP error
/// statuses are returned as responses and judged by the client.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
