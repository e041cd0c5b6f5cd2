//! Configuration file resolution and TOML loading
//!
//! Config file priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Platform config file (`~/.config/smsplayer/config.toml`, then `/etc/smsplayer/config.toml` on Linux)
//! 4. Built-in defaults (no file)
//!
//! A missing file never prevents startup: a warning is logged and defaults apply.
//! A file that exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name used under the platform config directory
pub const APP_DIR_NAME: &str = "smsplayer";

/// Config file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve which configuration file to read, if any.
///
/// Returns `None` when neither an explicit path nor a platform file exists.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config file
    default_config_file()
}

/// Locate the platform config file, returning it only if it exists
pub fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));

    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc")
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Parse a TOML file into `T`
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    let value = toml::from_str(&content)?;
    Ok(value)
}

/// Load `T` from an optional TOML file, falling back to `T::default()`.
///
/// - `None`: defaults
/// - path does not exist: warning, defaults
/// - path exists but is malformed: `Error::Toml`
pub fn load_toml_or_default<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match path {
        None => {
            info!("No config file found, using built-in defaults");
            Ok(T::default())
        }
        Some(path) if !path.exists() => {
            warn!(
                "Config file {} does not exist, using built-in defaults",
                path.display()
            );
            Ok(T::default())
        }
        Some(path) if path.is_dir() => Err(Error::Config(format!(
            "Config path {} is a directory",
            path.display()
        ))),
        Some(path) => {
            info!("Loading config file {}", path.display());
            load_toml(path)
        }
    }
}
