use crate::format::{format_date, format_file_size, path_crumbs, PathCrumb};
use crate::models::MediaRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    Text(String),
    /// Clickable folder breadcrumb.
    Path(Vec<PathCrumb>),
    /// Tag buttons, each filterable and removable from the item.
    Tags(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoEntry {
    pub label: &'static str,
    pub value: InfoValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoSection {
    pub title: &'static str,
    pub entries: Vec<InfoEntry>,
}

/// Metadata side panel of the lightbox.
#[derive(Debug, Clone)]
pub struct InfoPanel {
    open: bool,
    width: f64,
}

impl InfoPanel {
    pub fn new(width: f64) -> Self {
        Self { open: false, width }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Returns the new open state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Horizontal space the panel takes from the lightbox frame.
    pub fn width_offset(&self) -> f64 {
        if self.open {
            self.width
        } else {
            0.0
        }
    }

    /// Builds the panel content for the item at `index` of `count`.
    pub fn sections(
        &self,
        record: &MediaRecord,
        index: usize,
        count: usize,
        tags: &[String],
    ) -> Vec<InfoSection> {
        let text = InfoValue::Text;
        let entry = |label: &'static str, value: InfoValue| InfoEntry { label, value };
        let or_unknown = |s: &str| {
            if s.is_empty() {
                "Unknown".to_string()
            } else {
                s.to_string()
            }
        };
        let dim = |v: u32| {
            if v == 0 {
                "?".to_string()
            } else {
                v.to_string()
            }
        };

        let kind = if record.is_video { "Video" } else { "Image" };
        let aspect = if record.aspect_ratio > 0.0 {
            format!("{:.2}", record.aspect_ratio)
        } else {
            "Unknown".to_string()
        };
        let duration = record
            .duration
            .as_deref()
            .filter(|_| record.is_video)
            .unwrap_or("-");
        let path = if record.path.is_empty() {
            text("Unknown".to_string())
        } else {
            InfoValue::Path(path_crumbs(Some(&record.path)))
        };

        vec![
            InfoSection {
                title: "File Information",
                entries: vec![
                    entry("Name", text(or_unknown(&record.name))),
                    entry("Type", text(kind.to_string())),
                    entry("Size", text(format_file_size(record.size_bytes))),
                    entry(
                        "Dimensions",
                        text(format!("{} x {}", dim(record.width), dim(record.height))),
                    ),
                    entry("Aspect Ratio", text(aspect)),
                    entry("Duration", text(duration.to_string())),
                    entry("Path", path),
                ],
            },
            InfoSection {
                title: "Technical Details",
                entries: vec![
                    entry("Hash", text(record.hash.clone())),
                    entry("Created", text(format_date(record.date_created))),
                    entry("Modified", text(format_date(record.date_modified))),
                ],
            },
            InfoSection {
                title: "Gallery Info",
                entries: vec![
                    entry("Index", text(format!("{} of {}", index + 1, count))),
                    entry(
                        "Rotation",
                        text(format!("{}°", record.effective_rotation().degrees())),
                    ),
                    entry("Tags", InfoValue::Tags(tags.to_vec())),
                ],
            },
        ]
    }
}
