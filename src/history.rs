//! Navigable-history locations and an in-memory session history.
//!
//! Three logical locations exist: the root listing, a filtered search view and
//! the lightbox for a single media hash. They are read when a session starts
//! and pushed on every filter or navigation change.

use std::fmt;

use tracing::debug;

use crate::models::MediaQuery;

const SEARCH_PREFIX: &str = "/search";
const LIGHTBOX_PREFIX: &str = "/lightbox/";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Location {
    #[default]
    Root,
    Search(MediaQuery),
    Lightbox(String),
}

impl Location {
    /// Location a filtered listing lives at; an empty query is the root.
    pub fn for_query(query: &MediaQuery) -> Self {
        if query.is_empty() {
            Self::Root
        } else {
            Self::Search(query.clone())
        }
    }

    /// Parses a path with optional query string, e.g. `/search?tag=a`.
    /// Anything unrecognised maps to the root listing.
    pub fn parse(path_and_query: &str) -> Self {
        let (path, query) = path_and_query
            .split_once('?')
            .unwrap_or((path_and_query, ""));

        if let Some(hash) = path.strip_prefix(LIGHTBOX_PREFIX) {
            if !hash.is_empty() {
                return Self::Lightbox(hash.to_string());
            }
        }
        if path == SEARCH_PREFIX {
            return Self::for_query(&MediaQuery::parse(query));
        }
        Self::Root
    }

    pub fn to_url(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Search(query) if query.is_empty() => "/".to_string(),
            Self::Search(query) => format!("{SEARCH_PREFIX}?{}", query.to_query_string()),
            Self::Lightbox(hash) => format!("{LIGHTBOX_PREFIX}{hash}"),
        }
    }

    pub fn is_lightbox(&self) -> bool {
        matches!(self, Self::Lightbox(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// The navigable-history surface the session writes to.
pub trait History {
    fn current(&self) -> &Location;
    fn push(&mut self, location: Location);
}

/// Back/forward stack kept in memory.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<Location>,
    position: usize,
}

impl SessionHistory {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            position: 0,
        }
    }

    /// Steps back; the returned location is what the session should reload
    /// without pushing.
    pub fn back(&mut self) -> Option<&Location> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        self.entries.get(self.position)
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if self.position + 1 >= self.entries.len() {
            return None;
        }
        self.position += 1;
        self.entries.get(self.position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(Location::Root)
    }
}

impl History for SessionHistory {
    fn current(&self) -> &Location {
        &self.entries[self.position]
    }

    fn push(&mut self, location: Location) {
        debug!("History push {}", location);
        self.entries.truncate(self.position + 1);
        self.entries.push(location);
        self.position = self.entries.len() - 1;
    }
}
