use crate::assembler;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::grid::{self, TileGrid};
use crate::metadata::CaptureRecord;
use crate::persister;
use crate::source::CaptureSource;
use crate::state;
use crate::wallpaper::WallpaperSetter;
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The remote capture matches the stored one; nothing was touched.
    Unchanged,
    Applied {
        record: CaptureRecord,
        image_path: PathBuf,
    },
}

/// One run: load state, fetch metadata, stop if unchanged, otherwise
/// assemble, persist and apply.
pub struct Pipeline<'a> {
    config: &'a AppConfig,
    source: &'a dyn CaptureSource,
    wallpaper: &'a dyn WallpaperSetter,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a AppConfig,
        source: &'a dyn CaptureSource,
        wallpaper: &'a dyn WallpaperSetter,
    ) -> Self {
        Self {
            config,
            source,
            wallpaper,
        }
    }

    pub fn run(&self) -> Result<Outcome, AppError> {
        let state_path = self.config.state_path();
        let image_path = self.config.image_path();

        let previous = state::load_state(&state_path);

        let latest = self.source.latest_capture()?;
        log::info!("Latest capture: {} ({})", latest.capture_timestamp, latest.file_reference);

        if is_unchanged(previous.as_ref(), &latest) {
            log::info!("No new image, keeping the old one");
            return Ok(Outcome::Unchanged);
        }

        let tz = self.config.timezone()?;
        let frame = grid::frame_time(&latest.capture_timestamp, &tz, self.config.delay_hours)?;
        log::debug!("Fetching frame {}", frame);

        let tile_grid = TileGrid::from_config(self.config);
        let canvas = assembler::assemble(self.source, &tile_grid, &self.config.retry, &frame)?;

        persister::write_png(&canvas, &image_path)?;
        state::save_state(&state_path, &latest);

        self.wallpaper.set_wallpaper(&image_path)?;

        Ok(Outcome::Applied {
            record: latest,
            image_path,
        })
    }
}

pub fn is_unchanged(previous: Option<&CaptureRecord>, latest: &CaptureRecord) -> bool {
    previous.is_some_and(|p| p.same_capture(latest))
}
