use crate::config::AppConfig;
use crate::error::AppError;
use std::path::Path;
use std::process::Command;

pub trait WallpaperSetter {
    fn set_wallpaper(&self, image_path: &Path) -> Result<(), AppError>;
}

/// Runs an external desktop utility, `feh --bg-max <image>` by default.
pub struct CommandWallpaperSetter {
    program: String,
    args: Vec<String>,
}

impl CommandWallpaperSetter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.wallpaper_command, config.wallpaper_args.clone())
    }
}

impl WallpaperSetter for CommandWallpaperSetter {
    fn set_wallpaper(&self, image_path: &Path) -> Result<(), AppError> {
        log::debug!("Running {} {:?} {:?}", self.program, self.args, image_path);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(image_path)
            .status()
            .map_err(|e| AppError::Wallpaper(format!("could not launch {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(AppError::Wallpaper(format!("{} exited with {}", self.program, status)));
        }
        log::info!("Wallpaper set to {:?}", image_path);
        Ok(())
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn zero_exit_is_success() {
        let setter = CommandWallpaperSetter::new("true", vec![]);
        assert!(setter.set_wallpaper(Path::new("/tmp/latest.png")).is_ok());
    }

    #[test]
    fn non_zero_exit_is_fatal() {
        let setter = CommandWallpaperSetter::new("false", vec!["--bg-max".to_string()]);
        let err = setter.set_wallpaper(Path::new("/tmp/latest.png")).unwrap_err();
        assert!(matches!(err, AppError::Wallpaper(_)));
    }

    #[test]
    fn missing_program_is_fatal() {
        let setter = CommandWallpaperSetter::new("himawari-no-such-program", vec![]);
        let err = setter.set_wallpaper(Path::new("/tmp/latest.png")).unwrap_err();
        assert!(err.to_string().contains("could not launch"));
    }
}
