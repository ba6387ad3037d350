//! Client-side engine for a web media gallery: justified-row layout, filter
//! and selection state, interaction modes and the lightbox, driven against
//! the gallery server's JSON API.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod layout;
pub mod models;
pub mod state;
pub mod ui;

pub use app::{GalleryApp, GalleryView};
pub use config::Config;
pub use error::{GalleryError, Result};
