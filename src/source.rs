use crate::error::AppError;
use crate::metadata::CaptureRecord;
use image::DynamicImage;

/// Where captures and their tiles come from.
pub trait CaptureSource {
    fn latest_capture(&self) -> Result<CaptureRecord, AppError>;
    fn fetch_tile(&self, url: &str) -> Result<DynamicImage, AppError>;
}
