//! Game configuration
//!
//! Window and loop settings, stored as RON. Every field is optional in the
//! file; missing ones take their defaults.
//!
//! ```ron
//! (
//!   width: 800,
//!   height: 600,
//!   title: "Space Rocks",
//!   fps_limit: Fps60,
//!   restart_key: Enter,
//! )
//! ```

use crate::game::FpsLimit;
use crate::input::Key;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for config loading and validation
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    InvalidWindowSize { width: u32, height: u32 },
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ConfigError::InvalidWindowSize { width, height } => {
                write!(f, "Invalid window size {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    pub title: String,
    pub fps_limit: FpsLimit,
    /// Key that leaves the game-over screen
    pub restart_key: Key,
    pub high_dpi: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "pixelkit".to_string(),
            fps_limit: FpsLimit::default(),
            restart_key: Key::Space,
            high_dpi: false,
        }
    }
}

impl GameConfig {
    /// Defaults with a different window size and title
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Load `path`, or fall back to defaults when it's missing or broken.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// A window needs a non-zero size
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.restart_key, Key::Space);
        assert_eq!(config.fps_limit, FpsLimit::Fps60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = GameConfig::from_ron("(width: 800, restart_key: Enter)").unwrap();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 480);
        assert_eq!(config.restart_key, Key::Enter);
        assert_eq!(config.title, "pixelkit");
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = GameConfig::from_ron("(width: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWindowSize { width: 0, height: 480 }));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.ron");
        let mut config = GameConfig::new(320, 240, "tiny");
        config.fps_limit = FpsLimit::Fps30;
        config.save(&path).unwrap();

        assert_eq!(GameConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(width: \"wide\"").unwrap();

        assert!(matches!(GameConfig::load(&path), Err(ConfigError::ParseError(_))));
        assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());
        assert_eq!(GameConfig::load_or_default(dir.path().join("absent.ron")), GameConfig::default());
    }
}
