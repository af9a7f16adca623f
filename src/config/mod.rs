use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the Unreal Editor command socket listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Transport tunables. The defaults match the Editor plugin's expectations;
/// only touch these when pointing at a slow remote editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Extra attempts after the first failure (N retries = N+1 attempts)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential backoff, milliseconds
    #[serde(default = "default_base_retry_delay_ms")]
    pub base_retry_delay_ms: u64,

    /// Backoff cap, milliseconds
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,

    /// Receive timeout for ordinary commands
    #[serde(default = "default_recv_timeout_secs")]
    pub recv_timeout_secs: u64,

    /// Receive timeout for large operations (imports, procedural builds)
    #[serde(default = "default_large_op_recv_timeout_secs")]
    pub large_op_recv_timeout_secs: u64,

    /// Read chunk size in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    55557
}
fn default_max_retries() -> u32 {
    3
}
fn default_base_retry_delay_ms() -> u64 {
    500
}
fn default_max_retry_delay_ms() -> u64 {
    5000
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_send_timeout_secs() -> u64 {
    10
}
fn default_recv_timeout_secs() -> u64 {
    30
}
fn default_large_op_recv_timeout_secs() -> u64 {
    300
}
fn default_buffer_size() -> usize {
    8192
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_retry_delay_ms: default_base_retry_delay_ms(),
            max_retry_delay_ms: default_max_retry_delay_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
            send_timeout_secs: default_send_timeout_secs(),
            recv_timeout_secs: default_recv_timeout_secs(),
            large_op_recv_timeout_secs: default_large_op_recv_timeout_secs(),
            buffer_size: default_buffer_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl TransportConfig {
    pub fn base_retry_delay(&self) -> Duration {
        Duration::from_millis(self.base_retry_delay_ms)
    }

    pub fn max_retry_delay(&self) -> Duration {
        Duration::from_millis(self.max_retry_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_secs(self.recv_timeout_secs)
    }

    pub fn large_op_recv_timeout(&self) -> Duration {
        Duration::from_secs(self.large_op_recv_timeout_secs)
    }
}

impl Config {
    /// Load from an explicit path, or the resolved default location.
    ///
    /// Creates a commented template on first run at the default location;
    /// an explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                Ok(toml::from_str(&content)?)
            }
            None => {
                let path = paths::config_file()?;
                if !path.exists() {
                    let config = Config::default();
                    config.save_with_template(&path)?;
                    return Ok(config);
                }
                let content = fs::read_to_string(&path)?;
                Ok(toml::from_str(&content)?)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Save config with a helpful template (for first-time setup)
    fn save_with_template(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
        eprintln!("Created default config at {}", path.display());

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        paths::config_file()
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["engine", "host"] => Ok(self.engine.host.clone()),
            ["engine", "port"] => Ok(self.engine.port.to_string()),
            ["transport", "max_retries"] => Ok(self.transport.max_retries.to_string()),
            ["transport", "recv_timeout_secs"] => Ok(self.transport.recv_timeout_secs.to_string()),
            ["transport", "large_op_recv_timeout_secs"] => {
                Ok(self.transport.large_op_recv_timeout_secs.to_string())
            }
            ["logging", "level"] => Ok(self.logging.level.clone()),
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["engine", "host"] => self.engine.host = value.to_string(),
            ["engine", "port"] => self.engine.port = value.parse()?,
            ["transport", "max_retries"] => self.transport.max_retries = value.parse()?,
            ["transport", "recv_timeout_secs"] => {
                self.transport.recv_timeout_secs = value.parse()?
            }
            ["transport", "large_op_recv_timeout_secs"] => {
                self.transport.large_op_recv_timeout_secs = value.parse()?
            }
            ["logging", "level"] => self.logging.level = value.to_string(),
            _ => anyhow::bail!("Unknown config key: {}", key),
        }

        Ok(())
    }
}

/// Default config template with helpful comments (used for first-time setup)
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# unreal-bridge Configuration
# Auto-created on first run. Edit as needed.

[engine]
# Where the Unreal Editor command plugin listens
host = "127.0.0.1"
port = 55557

[transport]
# Retry/backoff and timeout tuning. The defaults are right for a local
# editor; raise the timeouts if the editor runs on another machine.
# max_retries = 3
# base_retry_delay_ms = 500
# max_retry_delay_ms = 5000
# connect_timeout_secs = 10
# send_timeout_secs = 10
# recv_timeout_secs = 30
# large_op_recv_timeout_secs = 300
# buffer_size = 8192

[logging]
level = "info"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_expectations() {
        let config = Config::default();
        assert_eq!(config.engine.host, "127.0.0.1");
        assert_eq!(config.engine.port, 55557);
        assert_eq!(config.transport.max_retries, 3);
        assert_eq!(config.transport.base_retry_delay(), Duration::from_millis(500));
        assert_eq!(config.transport.max_retry_delay(), Duration::from_secs(5));
        assert_eq!(config.transport.recv_timeout(), Duration::from_secs(30));
        assert_eq!(config.transport.large_op_recv_timeout(), Duration::from_secs(300));
        assert_eq!(config.transport.buffer_size, 8192);
    }

    #[test]
    fn template_parses_to_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(parsed.engine.port, Config::default().engine.port);
        assert_eq!(parsed.transport.max_retries, 3);
    }

    #[test]
    fn save_and_reload_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.engine.port = 55600;
        config.transport.recv_timeout_secs = 60;
        config.save(&path).unwrap();

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.engine.port, 55600);
        assert_eq!(reloaded.transport.recv_timeout_secs, 60);
        // Untouched fields keep their defaults
        assert_eq!(reloaded.transport.max_retries, 3);
    }

    #[test]
    fn get_set_value() {
        let mut config = Config::default();
        config.set_value("engine.port", "56000").unwrap();
        assert_eq!(config.get_value("engine.port").unwrap(), "56000");
        assert!(config.set_value("engine.bogus", "1").is_err());
        assert!(config.get_value("nope").is_err());
    }
}
