//! Path resolution for dbconverge
//!
//! # Environment Variables
//!
//! - `DBCONVERGE_CONFIG_DIR` - Override config directory
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `DBCONVERGE_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/dbconverge` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\dbconverge`
//!    - macOS/Linux: `~/.config/dbconverge`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "DBCONVERGE_CONFIG_DIR";

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the dbconverge config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("dbconverge");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join("dbconverge");
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("dbconverge");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Default location of the config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables leave the input unchanged.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: only this test touches this variable
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: as above
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/dbconverge", || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/dbconverge"));
            assert_eq!(
                config_file().unwrap(),
                PathBuf::from("/custom/dbconverge/config.toml")
            );
        });
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/certs/root.crt");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("certs").join("root.crt"));
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/etc/ssl/root.crt"), PathBuf::from("/etc/ssl/root.crt"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$DBCONVERGE_NONEXISTENT_12345/file");
        assert_eq!(
            result,
            PathBuf::from("/path/$DBCONVERGE_NONEXISTENT_12345/file")
        );
    }
}
