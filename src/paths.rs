//! Config-file path resolution.
//!
//! Two-level fallback:
//! 1. UNREAL_BRIDGE_CONFIG env var (explicit file path)
//! 2. XDG config dir via `etcetera` (~/.config/unreal-bridge/config.toml)

use anyhow::Result;
use std::path::PathBuf;

/// Resolve the config file path using real environment variables.
pub fn config_file() -> Result<PathBuf> {
    config_file_with_env(|key| std::env::var(key))
}

/// Resolve with a custom env var lookup (for testing).
pub fn config_file_with_env<F>(env_fn: F) -> Result<PathBuf>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    use etcetera::BaseStrategy;

    if let Ok(path) = env_fn("UNREAL_BRIDGE_CONFIG") {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            return Ok(path);
        }
        // Relative env overrides are ignored per XDG spec
    }

    let strategy = etcetera::choose_base_strategy()
        .map_err(|e| anyhow::anyhow!("Failed to determine base directories: {}", e))?;

    Ok(strategy.config_dir().join("unreal-bridge").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_absolute() {
        let path = config_file_with_env(|key| {
            if key == "UNREAL_BRIDGE_CONFIG" {
                Ok("/etc/unreal-bridge.toml".to_string())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        })
        .unwrap();
        assert_eq!(path, PathBuf::from("/etc/unreal-bridge.toml"));
    }

    #[test]
    fn relative_env_override_ignored() {
        let path = config_file_with_env(|key| {
            if key == "UNREAL_BRIDGE_CONFIG" {
                Ok("relative/config.toml".to_string())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        })
        .unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("unreal-bridge/config.toml"));
    }
}
