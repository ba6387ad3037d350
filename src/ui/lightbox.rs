//! Full-screen sequential viewer over the collection cursor.

use tracing::debug;

use crate::api;
use crate::error::{GalleryError, Result};
use crate::history::{History, Location};
use crate::models::{MediaCollection, Rotation};

/// Share of the frame the media may cover.
const WIDTH_SHARE: f64 = 0.90;
const HEIGHT_SHARE: f64 = 0.96;

/// What to open. The index wins when both are set and it is in range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaTarget {
    pub index: Option<usize>,
    pub hash: Option<String>,
}

impl MediaTarget {
    pub fn index(index: usize) -> Self {
        Self {
            index: Some(index),
            hash: None,
        }
    }

    pub fn hash(hash: impl Into<String>) -> Self {
        Self {
            index: None,
            hash: Some(hash.into()),
        }
    }

    fn resolve(&self, collection: &MediaCollection) -> Option<usize> {
        self.index
            .filter(|idx| *idx < collection.len())
            .or_else(|| self.hash.as_deref().and_then(|h| collection.index_of(h)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaElement {
    Image,
    Video,
}

/// Everything a front end needs to draw the lightbox for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub index: usize,
    pub hash: String,
    pub name: String,
    pub element: MediaElement,
    pub rotation: Rotation,
    pub original_url: String,
    /// Shown while the original is still loading.
    pub thumbnail_url: String,
}

/// Result of closing the lightbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dismissal {
    /// A video source was attached and has to be released.
    pub stop_video: bool,
    /// Grid scroll offset from before the lightbox opened.
    pub restore_scroll: Option<f64>,
}

/// Maximum on-screen box for the media element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBounds {
    pub max_width: f64,
    pub max_height: f64,
}

/// Size limits for media inside a `frame_w` x `frame_h` lightbox.
///
/// Upright media takes plain shares of the frame; the frame itself is
/// expected to shrink when the side panel opens. Quarter-turned media is
/// constrained before rotation, so its limits come from the swapped axes and
/// the panel width `side_offset` is taken off explicitly.
pub fn frame_bounds(
    frame_w: f64,
    frame_h: f64,
    rotation: Rotation,
    side_offset: f64,
) -> FrameBounds {
    let across = frame_w * WIDTH_SHARE;
    let down = frame_h * HEIGHT_SHARE;
    if rotation.is_quarter_turn() {
        FrameBounds {
            max_width: down,
            max_height: across - side_offset,
        }
    } else {
        FrameBounds {
            max_width: across,
            max_height: down,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LightboxNavigator {
    base_url: String,
    open: bool,
    showing_video: bool,
    /// Where closing returns to; never a lightbox location.
    return_to: Location,
    saved_scroll: Option<f64>,
}

impl LightboxNavigator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            open: false,
            showing_video: false,
            return_to: Location::Root,
            saved_scroll: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Location that closing will push.
    pub fn return_location(&self) -> &Location {
        &self.return_to
    }

    /// Records the grid scroll offset handed back by [`Self::close`].
    pub fn remember_scroll(&mut self, offset: f64) {
        self.saved_scroll = Some(offset);
    }

    /// Opens (or moves) the lightbox to `target`.
    ///
    /// Fails with [`GalleryError::NotFound`] and changes nothing when the
    /// target resolves neither by index nor by hash.
    pub fn show(
        &mut self,
        collection: &mut MediaCollection,
        history: &mut impl History,
        target: &MediaTarget,
        update_history: bool,
    ) -> Result<Presentation> {
        let index = target.resolve(collection).ok_or_else(|| {
            GalleryError::NotFound(
                target
                    .hash
                    .clone()
                    .or_else(|| target.index.map(|i| format!("#{i}")))
                    .unwrap_or_default(),
            )
        })?;

        collection.set_cursor(index as isize)?;
        let record = collection.get_by_index(index)?;
        let hash = record.hash.clone();

        if update_history {
            if !history.current().is_lightbox() {
                self.return_to = history.current().clone();
            }
            history.push(Location::Lightbox(hash.clone()));
        }

        let element = if record.is_video {
            MediaElement::Video
        } else {
            MediaElement::Image
        };
        self.open = true;
        self.showing_video = element == MediaElement::Video;
        debug!(index, %hash, ?element, "Lightbox showing");

        Ok(Presentation {
            index,
            name: record.name.clone(),
            element,
            rotation: record.effective_rotation(),
            original_url: api::original_url(&self.base_url, &hash),
            thumbnail_url: api::thumbnail_url(&self.base_url, &hash),
            hash,
        })
    }

    /// Shows the item after the cursor, wrapping at the end.
    pub fn next(
        &mut self,
        collection: &mut MediaCollection,
        history: &mut impl History,
    ) -> Result<Presentation> {
        self.step(collection, history, 1)
    }

    /// Shows the item before the cursor, wrapping at the start.
    pub fn prev(
        &mut self,
        collection: &mut MediaCollection,
        history: &mut impl History,
    ) -> Result<Presentation> {
        self.step(collection, history, -1)
    }

    fn step(
        &mut self,
        collection: &mut MediaCollection,
        history: &mut impl History,
        offset: isize,
    ) -> Result<Presentation> {
        let index = collection.advance_cursor(offset, true)?;
        self.show(collection, history, &MediaTarget::index(index), true)
    }

    /// Hides the lightbox. With `push_state` the location from before it
    /// opened is pushed; without it history is left alone (back/forward
    /// navigation already moved it).
    pub fn close(&mut self, history: &mut impl History, push_state: bool) -> Dismissal {
        let return_to = std::mem::take(&mut self.return_to);
        if push_state {
            history.push(return_to);
        }
        let dismissal = Dismissal {
            stop_video: self.showing_video,
            restore_scroll: self.saved_scroll.take(),
        };
        self.open = false;
        self.showing_video = false;
        debug!(push_state, "Lightbox closed");
        dismissal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::SessionHistory;
    use crate::models::{MediaQuery, MediaRecord};

    fn collection(n: usize) -> MediaCollection {
        let mut c = MediaCollection::new();
        c.set_new_media((0..n).map(|i| {
            let hash = format!("h{i}");
            let mut record = MediaRecord::new(hash.clone(), format!("{i}.jpg"), 400, 300);
            record.is_video = i == 2;
            (hash, record)
        }));
        c
    }

    fn search() -> Location {
        Location::Search(MediaQuery {
            tags: vec!["cat".into()],
            ..Default::default()
        })
    }

    #[test]
    fn test_show_by_index_pushes_lightbox_location() {
        let mut items = collection(3);
        let mut history = SessionHistory::new(search());
        let mut lightbox = LightboxNavigator::new("http://host");

        let shown = lightbox
            .show(&mut items, &mut history, &MediaTarget::index(1), true)
            .unwrap();
        assert_eq!(shown.hash, "h1");
        assert_eq!(shown.element, MediaElement::Image);
        assert_eq!(shown.original_url, "http://host/media/h1/original");
        assert_eq!(items.cursor(), Some(1));
        assert_eq!(history.current(), &Location::Lightbox("h1".into()));
        assert_eq!(lightbox.return_location(), &search());
    }

    #[test]
    fn test_index_wins_over_hash_and_falls_back() {
        let mut items = collection(3);
        let mut history = SessionHistory::default();
        let mut lightbox = LightboxNavigator::new("");

        let both = MediaTarget {
            index: Some(0),
            hash: Some("h2".into()),
        };
        let shown = lightbox.show(&mut items, &mut history, &both, false).unwrap();
        assert_eq!(shown.hash, "h0");

        let stale = MediaTarget {
            index: Some(9),
            hash: Some("h2".into()),
        };
        let shown = lightbox.show(&mut items, &mut history, &stale, false).unwrap();
        assert_eq!(shown.index, 2);
        assert_eq!(shown.element, MediaElement::Video);
        // Not pushed
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_unknown_target_changes_nothing() {
        let mut items = collection(3);
        items.set_cursor(1).unwrap();
        let mut history = SessionHistory::default();
        let mut lightbox = LightboxNavigator::new("");

        let err = lightbox
            .show(&mut items, &mut history, &MediaTarget::hash("nope"), true)
            .unwrap_err();
        assert!(matches!(err, GalleryError::NotFound(h) if h == "nope"));
        assert_eq!(items.cursor(), Some(1));
        assert_eq!(history.len(), 1);
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_next_prev_wrap() {
        let mut items = collection(3);
        let mut history = SessionHistory::default();
        let mut lightbox = LightboxNavigator::new("");
        lightbox
            .show(&mut items, &mut history, &MediaTarget::index(2), true)
            .unwrap();

        assert_eq!(lightbox.next(&mut items, &mut history).unwrap().index, 0);
        assert_eq!(lightbox.prev(&mut items, &mut history).unwrap().index, 2);
        assert_eq!(lightbox.prev(&mut items, &mut history).unwrap().index, 1);
        // Stepping inside the lightbox keeps the original return point
        assert_eq!(lightbox.return_location(), &Location::Root);
    }

    #[test]
    fn test_close_restores_location_and_scroll() {
        let mut items = collection(3);
        let mut history = SessionHistory::new(search());
        let mut lightbox = LightboxNavigator::new("");
        lightbox
            .show(&mut items, &mut history, &MediaTarget::index(2), true)
            .unwrap();
        lightbox.remember_scroll(420.0);

        let dismissal = lightbox.close(&mut history, true);
        assert!(dismissal.stop_video);
        assert_eq!(dismissal.restore_scroll, Some(420.0));
        assert_eq!(history.current(), &search());
        assert!(!lightbox.is_open());
        assert_eq!(lightbox.return_location(), &Location::Root);
    }

    #[test]
    fn test_close_without_push_leaves_history() {
        let mut items = collection(1);
        let mut history = SessionHistory::default();
        let mut lightbox = LightboxNavigator::new("");
        lightbox
            .show(&mut items, &mut history, &MediaTarget::index(0), true)
            .unwrap();
        let before = history.len();
        let dismissal = lightbox.close(&mut history, false);
        assert!(!dismissal.stop_video);
        assert_eq!(dismissal.restore_scroll, None);
        assert_eq!(history.len(), before);
    }

    #[test]
    fn test_frame_bounds() {
        let flat = frame_bounds(1000.0, 800.0, Rotation::Deg0, 0.0);
        assert_eq!(flat.max_width, 900.0);
        assert_eq!(flat.max_height, 768.0);

        // The panel offset only applies to quarter turns
        let upside = frame_bounds(1000.0, 800.0, Rotation::Deg180, 100.0);
        assert_eq!(upside.max_width, 900.0);
        assert_eq!(upside.max_height, 768.0);

        let quarter = frame_bounds(1000.0, 800.0, Rotation::Deg90, 100.0);
        assert_eq!(quarter.max_width, 768.0);
        assert_eq!(quarter.max_height, 800.0);
        assert_eq!(frame_bounds(1000.0, 800.0, Rotation::Deg270, 100.0), quarter);
    }
}
