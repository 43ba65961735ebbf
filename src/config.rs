use crate::error::AppError;
use chrono::FixedOffset;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const WORK_DIR_NAME: &str = ".himawari";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct RetryPolicy {
    /// Total attempts per tile, the first try included.
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub metadata_url: String,
    pub tile_base_url: String,
    pub grid_size: u32,
    pub tile_width: u32,
    pub delay_hours: i64,
    pub utc_offset_hours: i32,
    pub work_dir: PathBuf,
    pub image_file: String,
    pub state_file: String,
    pub wallpaper_command: String,
    pub wallpaper_args: Vec<String>,
    pub retry: RetryPolicy,
    pub log_level: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, AppError> {
        let home = dirs::home_dir().ok_or(AppError::NoHomeDir)?;
        Self::from_home(&home)
    }

    /// Built-in defaults, then `<home>/.himawari/config.toml` if present, then
    /// `HIMAWARI_*` environment variables.
    pub fn from_home(home: &Path) -> Result<Self, AppError> {
        Self::from_home_with_env(home, Some(environment()))
    }

    pub fn from_home_with_env(home: &Path, env: Option<Environment>) -> Result<Self, AppError> {
        let work_dir = home.join(WORK_DIR_NAME);
        let config_file = work_dir.join(CONFIG_FILE_NAME);

        let mut builder =
            defaults(&work_dir)?.add_source(File::from(config_file.as_path()).required(false));
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults only, rooted at `work_dir`. No file or environment lookup.
    #[cfg(test)]
    pub fn with_work_dir(work_dir: &Path) -> Result<Self, AppError> {
        let config: AppConfig = defaults(work_dir)?.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn image_path(&self) -> PathBuf {
        self.work_dir.join(&self.image_file)
    }

    pub fn state_path(&self) -> PathBuf {
        self.work_dir.join(&self.state_file)
    }

    pub fn timezone(&self) -> Result<FixedOffset, AppError> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                AppError::InvalidConfig(format!(
                    "utc_offset_hours {} is not a valid offset",
                    self.utc_offset_hours
                ))
            })
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.grid_size == 0 {
            return Err(AppError::InvalidConfig("grid_size must be at least 1".into()));
        }
        if self.tile_width == 0 {
            return Err(AppError::InvalidConfig("tile_width must be at least 1".into()));
        }
        if self.grid_size.checked_mul(self.tile_width).is_none() {
            return Err(AppError::InvalidConfig(format!(
                "a {}x{} grid of {}px tiles is too large",
                self.grid_size, self.grid_size, self.tile_width
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(AppError::InvalidConfig(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        Url::parse(&self.metadata_url)?;
        Url::parse(&self.tile_base_url)?;
        self.timezone()?;
        Ok(())
    }
}

/// `HIMAWARI_LOG_LEVEL`, `HIMAWARI_RETRY__MAX_ATTEMPTS`, and
/// `HIMAWARI_WALLPAPER_ARGS` (space separated) style overrides.
fn environment() -> Environment {
    Environment::with_prefix("HIMAWARI")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(" ")
        .with_list_parse_key("wallpaper_args")
}

fn defaults(work_dir: &Path) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default(
            "metadata_url",
            "http://himawari8-dl.nict.go.jp/himawari8/img/D531106/latest.json",
        )?
        .set_default("tile_base_url", "http://himawari8.nict.go.jp/img/D531106")?
        .set_default("grid_size", 4_i64)?
        .set_default("tile_width", 550_i64)?
        // Shift back so the wallpaper shows daylight during the local day.
        .set_default("delay_hours", 8_i64)?
        // Asia/Tokyo, which observes no DST.
        .set_default("utc_offset_hours", 9_i64)?
        .set_default("work_dir", work_dir.to_string_lossy().into_owned())?
        .set_default("image_file", "latest.png")?
        .set_default("state_file", "data")?
        .set_default("wallpaper_command", "feh")?
        .set_default("wallpaper_args", vec!["--bg-max"])?
        .set_default("retry.max_attempts", 2_i64)?
        .set_default("retry.backoff_ms", 0_i64)?
        .set_default("log_level", "info")
}
