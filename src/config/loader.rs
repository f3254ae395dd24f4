//! Configuration loading and discovery for `gallery.toml`
//!
//! Provides functions to find, load, and validate configuration.

use super::schema::GalleryConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "gallery.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse gallery.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Locate `gallery.toml` for a shop rooted somewhere at or below `start`.
///
/// The nearest file in `start` or one of its ancestors wins. Otherwise the
/// file under `$XDG_CONFIG_HOME/inkgrid/` (`~/.config/inkgrid/` when unset)
/// is used, if it exists.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let user_dir = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|base| base.join("inkgrid"));

    start
        .ancestors()
        .map(Path::to_path_buf)
        .chain(user_dir)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Load configuration.
///
/// An explicit path is loaded as is. Otherwise discovery starts from the
/// working directory, and the defaults apply when nothing is found.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("shop/gallery.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<GalleryConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(&env::current_dir().unwrap_or_default()),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading gallery config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(GalleryConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<GalleryConfig, ConfigError> {
    let config: GalleryConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}
