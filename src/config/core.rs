use crate::config::{OverlayConfig, RenderConfig, WindowConfig};
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FRAGVIEW_CONFIG";
pub const CONFIG_FILE_NAME: &str = "fragview.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid log level: {0}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub log_level: String,
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub overlay: OverlayConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Loads from `$FRAGVIEW_CONFIG` or the platform config directory.
    /// Never writes a file.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// Raises or lowers the global log filter to the configured level.
    pub fn apply_log_level(&self) -> Result<LevelFilter, ConfigError> {
        let level = self.log_level()?;
        log::set_max_level(level);
        Ok(level)
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("com", "MetroManDevTeam", "fragview")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let content = r#"
            log_level = "debug"

            [render]
            shader_path = "shaders/plasma.shader"

            [overlay]
            show_stats = true
        "#;
        let config = ViewerConfig::from_toml_str(content, Path::new("test.toml")).unwrap();

        assert_eq!(config.log_level().unwrap(), LevelFilter::Debug);
        assert_eq!(config.render.shader_path, PathBuf::from("shaders/plasma.shader"));
        assert_eq!(config.render.time_uniform, "iTime");
        assert_eq!(config.render.time_wrap_secs, 60);
        assert!(config.overlay.show_stats);
        assert_eq!(config.overlay.title, "You're awake");
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = ViewerConfig::load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[window]\nwidth = 1280\nheight = 720\nvsync = true\n").unwrap();

        let config = ViewerConfig::load_from(&path).unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert!(config.window.vsync);
        assert_eq!(config.window.title, "fragview");
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[window\nwidth = ").unwrap();
        assert!(matches!(
            ViewerConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_bad_log_level() {
        let config = ViewerConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.log_level(), Err(ConfigError::LogLevel(_))));
    }

    #[test]
    fn test_apply_log_level() {
        let config = ViewerConfig {
            log_level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(config.apply_log_level().unwrap(), LevelFilter::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);

        let bad = ViewerConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(bad.apply_log_level().is_err());
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_defaults_serialize() {
        let text = toml::to_string_pretty(&ViewerConfig::default()).unwrap();
        let back = ViewerConfig::from_toml_str(&text, Path::new("roundtrip.toml")).unwrap();
        assert_eq!(back, ViewerConfig::default());
    }
}
