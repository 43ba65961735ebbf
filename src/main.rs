mod assembler;
mod config;
mod error;
mod grid;
mod metadata;
mod persister;
mod pipeline;
mod source;
mod source_clients;
mod state;
mod wallpaper;

use crate::config::AppConfig;
use crate::pipeline::{Outcome, Pipeline};
use crate::source_clients::http::HttpSource;
use crate::wallpaper::CommandWallpaperSetter;
use anyhow::Result;
use log::info;

fn main() -> Result<()> {
    let config = AppConfig::new()?;

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting himawari-wallpaper");

    let source = HttpSource::new(&config)?;
    let wallpaper = CommandWallpaperSetter::from_config(&config);

    match Pipeline::new(&config, &source, &wallpaper).run() {
        Ok(Outcome::Unchanged) => {}
        Ok(Outcome::Applied { record, image_path }) => {
            info!("Applied capture {} from {:?}", record.capture_timestamp, image_path);
        }
        Err(e) => {
            log::error!("Run failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
