use std::collections::BTreeSet;

use crate::models::MediaType;

/// Effective filter for one `/api/media` request and for the `/search` view.
///
/// Encoded as `path=..&tag=..&itag=..&types=a,b`. Values are passed through
/// verbatim; the server rejects `&` and `=` inside tag names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaQuery {
    pub path: Option<String>,
    pub tags: Vec<String>,
    pub inverse_tags: Vec<String>,
    pub types: BTreeSet<MediaType>,
}

impl MediaQuery {
    pub fn is_empty(&self) -> bool {
        self.path.is_none()
            && self.tags.is_empty()
            && self.inverse_tags.is_empty()
            && self.types.is_empty()
    }

    /// Query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(path) = &self.path {
            params.push(format!("path={path}"));
        }
        params.extend(self.tags.iter().map(|t| format!("tag={t}")));
        params.extend(self.inverse_tags.iter().map(|t| format!("itag={t}")));
        if !self.types.is_empty() {
            let joined: Vec<&str> = self.types.iter().map(MediaType::as_str).collect();
            params.push(format!("types={}", joined.join(",")));
        }
        params.join("&")
    }

    /// Parses a query string, with or without the leading `?`. Unknown keys
    /// and unknown media types are ignored.
    pub fn parse(query: &str) -> Self {
        let mut out = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "path" => out.path = Some(value.to_string()),
                "tag" => out.tags.push(value.to_string()),
                "itag" => out.inverse_tags.push(value.to_string()),
                "types" => out
                    .types
                    .extend(value.split(',').filter_map(MediaType::parse)),
                _ => {}
            }
        }
        out
    }
}
