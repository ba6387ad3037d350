use std::collections::{BTreeSet, HashSet};

use crate::models::{MediaQuery, MediaType};

/// Per-tag filter state. One click moves a tag one step along
/// include → exclude → ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    Inactive,
    Active,
    Inverse,
}

impl TagState {
    pub fn next(self) -> Self {
        match self {
            Self::Inactive => Self::Active,
            Self::Active => Self::Inverse,
            Self::Inverse => Self::Inactive,
        }
    }
}

/// Tri-state tag filter plus an additive media-type filter.
///
/// A tag is in at most one of `active` and `inverse`; tags in neither are
/// inactive.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    active: HashSet<String>,
    inverse: HashSet<String>,
    types: BTreeSet<MediaType>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tag_inactive(&mut self, tag: &str) {
        self.active.remove(tag);
        self.inverse.remove(tag);
    }

    pub fn set_tag_active(&mut self, tag: &str) {
        self.inverse.remove(tag);
        self.active.insert(tag.to_string());
    }

    pub fn set_tag_inverse(&mut self, tag: &str) {
        self.active.remove(tag);
        self.inverse.insert(tag.to_string());
    }

    pub fn set_tag_state(&mut self, tag: &str, state: TagState) {
        match state {
            TagState::Inactive => self.set_tag_inactive(tag),
            TagState::Active => self.set_tag_active(tag),
            TagState::Inverse => self.set_tag_inverse(tag),
        }
    }

    pub fn tag_state(&self, tag: &str) -> TagState {
        if self.active.contains(tag) {
            TagState::Active
        } else if self.inverse.contains(tag) {
            TagState::Inverse
        } else {
            TagState::Inactive
        }
    }

    /// Advances `tag` one step along its cycle and returns the new state.
    pub fn cycle_tag(&mut self, tag: &str) -> TagState {
        let next = self.tag_state(tag).next();
        self.set_tag_state(tag, next);
        next
    }

    /// Sorted snapshot of the included tags.
    pub fn active_tags(&self) -> Vec<String> {
        sorted(&self.active)
    }

    /// Sorted snapshot of the excluded tags.
    pub fn inverse_tags(&self) -> Vec<String> {
        sorted(&self.inverse)
    }

    pub fn clear_tags(&mut self) {
        self.active.clear();
        self.inverse.clear();
    }

    pub fn add_type(&mut self, media_type: MediaType) {
        self.types.insert(media_type);
    }

    pub fn remove_type(&mut self, media_type: MediaType) {
        self.types.remove(&media_type);
    }

    pub fn clear_types(&mut self) {
        self.types.clear();
    }

    pub fn types(&self) -> &BTreeSet<MediaType> {
        &self.types
    }

    /// Clears everything, then takes the tags and types of `query`.
    ///
    /// A query naming the same tag in both lists ends up with the tag
    /// inverse, the later of the two writes.
    pub fn apply_query(&mut self, query: &MediaQuery) {
        self.clear_tags();
        self.clear_types();
        for tag in &query.tags {
            self.set_tag_active(tag);
        }
        for tag in &query.inverse_tags {
            self.set_tag_inverse(tag);
        }
        self.types.extend(query.types.iter().copied());
    }

    /// Effective query for the current filter under `path`.
    pub fn to_query(&self, path: Option<String>) -> MediaQuery {
        MediaQuery {
            path,
            tags: self.active_tags(),
            inverse_tags: self.inverse_tags(),
            types: self.types.clone(),
        }
    }
}

fn sorted(set: &HashSet<String>) -> Vec<String> {
    let mut tags: Vec<String> = set.iter().cloned().collect();
    tags.sort();
    tags
}
