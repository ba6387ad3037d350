use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mediagrid::api::MediaListResponse;
use mediagrid::history::Location;
use mediagrid::models::MediaCollection;
use mediagrid::Config;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mediagrid", version, about = "Justified grid preview for a media gallery")]
struct Cli {
    /// Saved `/api/media` response to lay out
    media: PathBuf,
    /// Window width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,
    /// Target row height (overrides config)
    #[arg(long)]
    row_height: Option<f64>,
    /// Location the listing was fetched for, e.g. `/search?tag=cat`
    #[arg(long)]
    location: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mediagrid=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load().context("Failed to load config")?;
    if let Some(height) = cli.row_height {
        config.target_row_height = height;
    }

    if let Some(location) = &cli.location {
        info!("Location {}", Location::parse(location));
    }

    let raw = std::fs::read_to_string(&cli.media)
        .with_context(|| format!("Failed to read media list: {:?}", cli.media))?;
    let response: MediaListResponse = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse media list: {:?}", cli.media))?;

    let mut collection = MediaCollection::new();
    collection.set_new_media(response.data);
    if collection.is_empty() {
        println!("No images found.");
        return Ok(());
    }

    let layout = config.layout();
    let ratios = collection.aspect_ratios();
    let rows = layout.compute_rows(&ratios, layout.content_width(cli.width));
    info!(items = collection.len(), rows = rows.len(), "Computed layout");

    for model in layout.place(&ratios, &rows) {
        let names: Vec<String> = model
            .items
            .iter()
            .filter_map(|item| {
                collection
                    .get_by_index(item.index)
                    .ok()
                    .map(|r| format!("{} ({:.0}px)", r.name, item.display_w))
            })
            .collect();
        println!(
            "row {:>3}  h={:>6.1}  {}",
            model.row_index,
            model.height_px,
            names.join(", ")
        );
    }
    println!(
        "total height {:.1}px",
        layout.total_height(&rows, layout.item_margin)
    );
    Ok(())
}
