//! Human-readable formatting for metadata shown next to media.

use chrono::{DateTime, Local, Utc};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// `1536` → `"1.5 KB"`. Zero reads as unknown.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "Unknown".to_string();
    }
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(SIZE_UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[exp])
}

/// Local date and time for an epoch-milliseconds timestamp.
pub fn format_date(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .filter(|ts| *ts != 0)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

/// One clickable segment of a folder breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCrumb {
    pub label: String,
    /// Path filter to apply; `None` shows media from every folder.
    pub filter: Option<String>,
}

/// Breadcrumb for a media path or a path filter.
///
/// Always starts with `ALL`; each folder segment follows with its cumulative
/// prefix (`a/`, `a/b/`). The final segment (file name, or the empty tail of
/// a filter ending in `/`) is dropped.
pub fn path_crumbs(path: Option<&str>) -> Vec<PathCrumb> {
    let mut crumbs = vec![PathCrumb {
        label: "ALL".to_string(),
        filter: None,
    }];

    let Some(path) = path.filter(|p| *p != "/") else {
        return crumbs;
    };

    let segments: Vec<&str> = path.split('/').collect();
    let mut cumulative = String::new();
    for segment in &segments[..segments.len() - 1] {
        cumulative.push_str(segment);
        cumulative.push('/');
        crumbs.push(PathCrumb {
            label: segment.to_string(),
            filter: Some(cumulative.clone()),
        });
    }
    crumbs
}
