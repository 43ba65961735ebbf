use serde_json::Error as SerdeJsonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] SerdeJsonError),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(Box<ureq::Error>),

    #[error("Invalid capture timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Failed to fetch tile {url} after {attempts} attempt(s)")]
    TileFetch { url: String, attempts: u32 },

    #[error("Wallpaper command failed: {0}")]
    Wallpaper(String),

    #[error("Could not resolve the home directory")]
    NoHomeDir,
}

impl From<ureq::Error> for AppError {
    fn from(e: ureq::Error) -> Self {
        AppError::Http(Box::new(e))
    }
}
