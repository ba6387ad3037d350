//! Ordered in-memory store for the media list of the last fetch.
//!
//! The collection keeps the server's ordering as the authoritative order for
//! next/prev navigation, a hash→record map for lookups, and a cursor pointing
//! at the item currently shown in the lightbox.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{GalleryError, Result};
use crate::models::{MediaRecord, Rotation};

#[derive(Debug, Default, Clone)]
pub struct MediaCollection {
    order: Vec<String>,
    records: HashMap<String, MediaRecord>,
    cursor: usize,
}

impl MediaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection with a freshly fetched list.
    ///
    /// A hash repeated in the input keeps its first position and its last
    /// record, so `order.len() == records.len()` always holds.
    pub fn set_new_media<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, MediaRecord)>,
    {
        let pairs = pairs.into_iter();
        let mut order = Vec::with_capacity(pairs.size_hint().0);
        let mut records = HashMap::with_capacity(pairs.size_hint().0);

        for (hash, mut record) in pairs {
            record.hash = hash.clone();
            if records.insert(hash.clone(), record).is_none() {
                order.push(hash);
            }
        }

        self.order = order;
        self.records = records;
        self.cursor = 0;
        debug!("Replaced media collection with {} items", self.order.len());
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get_media(&self, hash: &str) -> Option<&MediaRecord> {
        self.records.get(hash)
    }

    pub fn get_by_index(&self, index: usize) -> Result<&MediaRecord> {
        self.order
            .get(index)
            .and_then(|hash| self.records.get(hash))
            .ok_or(GalleryError::OutOfRange {
                index,
                len: self.len(),
            })
    }

    pub fn hash_at(&self, index: usize) -> Option<&str> {
        self.order.get(index).map(String::as_str)
    }

    pub fn index_of(&self, hash: &str) -> Option<usize> {
        self.order.iter().position(|h| h == hash)
    }

    /// Hashes for a set of indices, in the order given. Indices outside the
    /// collection are skipped.
    pub fn get_hashes_at_indices<I>(&self, indices: I) -> Vec<String>
    where
        I: IntoIterator<Item = usize>,
    {
        indices
            .into_iter()
            .filter_map(|idx| self.order.get(idx).cloned())
            .collect()
    }

    /// Aspect ratios in collection order, the layout engine's only input.
    pub fn aspect_ratios(&self) -> Vec<f64> {
        self.iter().map(|(_, record)| record.aspect_ratio).collect()
    }

    /// Records in collection order together with their index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MediaRecord)> + '_ {
        self.order
            .iter()
            .enumerate()
            .filter_map(move |(idx, hash)| self.records.get(hash).map(|r| (idx, r)))
    }

    /// Cursor position, `None` while the collection is empty.
    pub fn cursor(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.cursor)
    }

    pub fn current(&self) -> Option<&MediaRecord> {
        self.cursor().and_then(|idx| self.get_by_index(idx).ok())
    }

    pub fn current_hash(&self) -> Option<&str> {
        self.cursor().and_then(|idx| self.hash_at(idx))
    }

    /// Moves the cursor relative to its current position.
    ///
    /// With `wrap` the result is taken modulo the collection size (negative
    /// offsets included); without it the cursor stops at either end.
    pub fn advance_cursor(&mut self, offset: isize, wrap: bool) -> Result<usize> {
        let size = self.len();
        if size == 0 {
            return Err(GalleryError::EmptyCollection);
        }

        let target = self.cursor as isize + offset;
        self.cursor = if wrap {
            target.rem_euclid(size as isize) as usize
        } else {
            target.clamp(0, size as isize - 1) as usize
        };
        Ok(self.cursor)
    }

    /// Places the cursor at an absolute position, normalizing modulo size.
    pub fn set_cursor(&mut self, index: isize) -> Result<usize> {
        let size = self.len();
        if size == 0 {
            return Err(GalleryError::EmptyCollection);
        }
        self.cursor = index.rem_euclid(size as isize) as usize;
        Ok(self.cursor)
    }

    /// The only in-place mutation a record ever receives.
    pub fn set_rotation(&mut self, hash: &str, rotation: Rotation) -> Result<()> {
        let record = self
            .records
            .get_mut(hash)
            .ok_or_else(|| GalleryError::NotFound(hash.to_string()))?;
        record.rotation = Some(rotation);
        Ok(())
    }
}
