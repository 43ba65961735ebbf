use crate::config::RetryPolicy;
use crate::error::AppError;
use crate::grid::{TileCoordinate, TileGrid};
use crate::source::CaptureSource;
use chrono::{DateTime, FixedOffset};
use image::{imageops, DynamicImage, GenericImageView, RgbaImage};

/// Downloads every tile of `frame` and copies it into a single canvas.
///
/// The first tile that still fails after `retry.max_attempts` attempts aborts
/// the whole assembly; no partial canvas is ever returned.
pub fn assemble(
    source: &dyn CaptureSource,
    grid: &TileGrid,
    retry: &RetryPolicy,
    frame: &DateTime<FixedOffset>,
) -> Result<RgbaImage, AppError> {
    let side = grid.canvas_width();
    log::info!(
        "Assembling {}x{} tiles into a {}x{} image",
        grid.grid_size,
        grid.grid_size,
        side,
        side
    );
    let mut canvas = RgbaImage::new(side, side);

    for (coord, url) in grid.tile_urls(frame) {
        let tile = fetch_with_retry(source, &url, retry)?;
        draw_tile(&mut canvas, grid, coord, &tile);
        log::debug!("Placed tile ({}, {})", coord.column, coord.row);
    }

    log::info!("All tiles assembled.");
    Ok(canvas)
}

pub fn fetch_with_retry(
    source: &dyn CaptureSource,
    url: &str,
    retry: &RetryPolicy,
) -> Result<DynamicImage, AppError> {
    let mut attempt = 1;
    loop {
        match source.fetch_tile(url) {
            Ok(tile) => return Ok(tile),
            Err(e) if attempt < retry.max_attempts => {
                log::warn!(
                    "Tile {} failed (attempt {}/{}): {}",
                    url,
                    attempt,
                    retry.max_attempts,
                    e
                );
                if retry.backoff_ms > 0 {
                    std::thread::sleep(retry.backoff());
                }
                attempt += 1;
            }
            Err(e) => {
                log::error!("Tile {} failed on final attempt: {}", url, e);
                return Err(AppError::TileFetch {
                    url: url.to_string(),
                    attempts: attempt,
                });
            }
        }
    }
}

/// Source-copy of `tile` into its cell; anything beyond the cell is clipped.
pub fn draw_tile(canvas: &mut RgbaImage, grid: &TileGrid, coord: TileCoordinate, tile: &DynamicImage) {
    let rect = grid.tile_rect(coord);
    let (w, h) = tile.dimensions();
    let tile = if w != grid.tile_width || h != grid.tile_width {
        log::debug!(
            "Tile ({}, {}) is {}x{}, expected {}x{}",
            coord.column,
            coord.row,
            w,
            h,
            grid.tile_width,
            grid.tile_width
        );
        tile.crop_imm(0, 0, w.min(grid.tile_width), h.min(grid.tile_width))
            .to_rgba8()
    } else {
        tile.to_rgba8()
    };
    imageops::replace(canvas, &tile, i64::from(rect.x0), i64::from(rect.y0));
}
