use crate::error::AppError;
use image::{ImageOutputFormat, RgbaImage};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `canvas` as PNG to `path`. When the file cannot be created, the
/// parent directory is created (one level only) and the create is retried once.
pub fn write_png(canvas: &RgbaImage, path: &Path) -> Result<(), AppError> {
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            log::debug!("Could not create {:?} ({}), creating its directory", path, e);
            if let Some(dir) = path.parent() {
                fs::create_dir(dir)?;
                log::info!("Created output directory {:?}", dir);
            }
            File::create(path)?
        }
    };

    let mut writer = BufWriter::new(file);
    canvas.write_to(&mut writer, ImageOutputFormat::Png)?;
    writer.flush()?;
    log::info!("Wrote {}x{} image to {:?}", canvas.width(), canvas.height(), path);
    Ok(())
}
