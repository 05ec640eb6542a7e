//! Configuration management
//!
//! Per-control settings live in the host. This is the plugin-wide layer:
//! defaults, then an optional `pbox-txgain.{toml,json,yaml}` in the config
//! directory, then `PBOX_*` environment variables.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Base name of the optional config file (extension picked by the `config` crate)
const CONFIG_FILE_STEM: &str = "pbox-txgain";

const DEFAULT_LONG_PRESS_MS: u64 = 3000;
const DEFAULT_VOLUME_PATH: &str = "/api/aoip/volume-tx";
const DEFAULT_LOG_FILTER: &str = "pbox_txgain=debug";

#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    /// Hold time after which a press resets the level to 0 dB
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,

    /// Device endpoint path for TX volume updates
    #[serde(default = "default_volume_path")]
    pub volume_path: String,

    /// Optional request timeout. Unset means wait as long as the device takes.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// tracing-subscriber filter used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_long_press_ms() -> u64 {
    DEFAULT_LONG_PRESS_MS
}

fn default_volume_path() -> String {
    DEFAULT_VOLUME_PATH.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            volume_path: default_volume_path(),
            request_timeout_ms: None,
            log_filter: default_log_filter(),
        }
    }
}

impl PluginConfig {
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Full endpoint URL for a device address
    pub fn volume_url(&self, address: &str) -> String {
        let path = self.volume_path.trim_start_matches('/');
        format!("http://{}/{}", address.trim(), path)
    }
}

/// Get config directory (PBOX_CONFIG_DIR or platform default)
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PBOX_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/pbox-txgain");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("pbox-txgain");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config/pbox-txgain");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("pbox-txgain");
        }
    }

    PathBuf::from(".")
}

pub fn load_config() -> Result<PluginConfig> {
    let config_dir = get_config_dir();

    let config = ::config::Config::builder()
        .set_default("long_press_ms", DEFAULT_LONG_PRESS_MS as i64)?
        .set_default("volume_path", DEFAULT_VOLUME_PATH)?
        .set_default("log_filter", DEFAULT_LOG_FILTER)?
        .add_source(
            ::config::File::with_name(&config_dir.join(CONFIG_FILE_STEM).to_string_lossy())
                .required(false),
        )
        // PBOX_LONG_PRESS_MS, PBOX_REQUEST_TIMEOUT_MS, ...
        .add_source(
            ::config::Environment::with_prefix("PBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: PluginConfig = config.try_deserialize()?;
    tracing::debug!("Loaded plugin config from {:?}: {:?}", config_dir, config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        for key in [
            "PBOX_LONG_PRESS_MS",
            "PBOX_VOLUME_PATH",
            "PBOX_REQUEST_TIMEOUT_MS",
            "PBOX_LOG_FILTER",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_file_or_env() {
        clear_env();
        env::set_var("PBOX_CONFIG_DIR", "/tmp/pbox-test-nonexistent");

        let config = load_config().expect("config should load");

        env::remove_var("PBOX_CONFIG_DIR");

        assert_eq!(config.long_press_ms, 3000);
        assert_eq!(config.volume_path, "/api/aoip/volume-tx");
        assert!(config.request_timeout_ms.is_none());
        assert_eq!(config.long_press(), Duration::from_secs(3));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("PBOX_CONFIG_DIR", "/tmp/pbox-test-nonexistent");
        env::set_var("PBOX_LONG_PRESS_MS", "1500");
        env::set_var("PBOX_REQUEST_TIMEOUT_MS", "2000");

        let config = load_config().expect("config should load");

        clear_env();
        env::remove_var("PBOX_CONFIG_DIR");

        assert_eq!(config.long_press_ms, 1500);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(2)));
    }

    #[test]
    #[serial]
    fn test_config_file_is_read() {
        clear_env();
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("pbox-txgain.toml"),
            "long_press_ms = 2500\nvolume_path = \"/api/v2/volume\"\n",
        )
        .expect("write config");
        env::set_var("PBOX_CONFIG_DIR", dir.path());

        let config = load_config().expect("config should load");

        env::remove_var("PBOX_CONFIG_DIR");

        assert_eq!(config.long_press_ms, 2500);
        assert_eq!(config.volume_path, "/api/v2/volume");
    }

    #[test]
    fn test_volume_url() {
        let config = PluginConfig::default();
        assert_eq!(
            config.volume_url(" 192.168.1.50 "),
            "http://192.168.1.50/api/aoip/volume-tx"
        );
        assert_eq!(
            config.volume_url("pbox.local:8080"),
            "http://pbox.local:8080/api/aoip/volume-tx"
        );
    }
}
