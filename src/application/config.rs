use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub state: StateConfig,
}

/// General settings: check interval and the per-probe deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

/// Durable target-list location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

// --- Defaults ---

const fn default_interval() -> u64 {
    5
}

const fn default_probe_timeout() -> u64 {
    5
}

fn default_state_path() -> PathBuf {
    PathBuf::from("monitored.yml")
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from the default path, creating a default config file
    /// on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// invalid, or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is
    /// invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, serialization
    /// fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("lookout").join("config.toml"))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_sensible_values() {
        let config = AppConfig::default();
        assert_eq!(config.general.interval_secs, 5);
        assert_eq!(config.general.probe_timeout_secs, 5);
        assert_eq!(config.state.path, PathBuf::from("monitored.yml"));
    }

    #[test]
    fn serde_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let deserialized: AppConfig = toml::from_str(&toml_str).expect("deserialize");

        assert_eq!(
            deserialized.general.interval_secs,
            config.general.interval_secs
        );
        assert_eq!(
            deserialized.general.probe_timeout_secs,
            config.general.probe_timeout_secs
        );
        assert_eq!(deserialized.state.path, config.state.path);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse empty toml");
        assert_eq!(config.general.interval_secs, 5);
        assert_eq!(config.state.path, PathBuf::from("monitored.yml"));
    }

    #[test]
    fn partial_toml_fills_missing_with_defaults() {
        let toml_str = r#"
[general]
interval_secs = 30
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse partial toml");
        assert_eq!(config.general.interval_secs, 30);
        assert_eq!(config.general.probe_timeout_secs, 5);
        assert_eq!(config.state.path, PathBuf::from("monitored.yml"));
    }

    #[test]
    fn load_from_file() {
        let toml_str = r#"
[general]
interval_secs = 2
probe_timeout_secs = 10

[state]
path = "/tmp/targets.yml"
"#;
        let mut tmpfile = tempfile::NamedTempFile::new().expect("create tempfile");
        tmpfile
            .write_all(toml_str.as_bytes())
            .expect("write tmpfile");

        let config = AppConfig::load_from(tmpfile.path()).expect("load from file");
        assert_eq!(config.general.interval_secs, 2);
        assert_eq!(config.general.probe_timeout_secs, 10);
        assert_eq!(config.state.path, PathBuf::from("/tmp/targets.yml"));
    }

    #[test]
    fn config_path_contains_lookout() {
        let path = AppConfig::config_path().expect("config path");
        assert!(path.to_string_lossy().contains("lookout"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn save_to_creates_file_and_directories() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join("subdir").join("config.toml");

        let config = AppConfig::default();
        config.save_to(&path).expect("save_to");

        assert!(path.exists());
        let reloaded = AppConfig::load_from(&path).expect("reload");
        assert_eq!(reloaded.general.interval_secs, config.general.interval_secs);
        assert_eq!(reloaded.state.path, config.state.path);
    }

    #[test]
    fn load_or_create_loads_existing_file() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join("config.toml");

        let toml_str = r#"
[general]
interval_secs = 42
"#;
        std::fs::write(&path, toml_str).expect("write");

        let config = AppConfig::load_or_create(&path).expect("load_or_create");
        assert_eq!(config.general.interval_secs, 42);
    }

    #[test]
    fn load_or_create_creates_default_when_missing() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join("lookout").join("config.toml");

        assert!(!path.exists());
        let config = AppConfig::load_or_create(&path).expect("load_or_create");

        assert!(path.exists());
        assert_eq!(config.general.interval_secs, 5);

        let reloaded = AppConfig::load_from(&path).expect("reload created file");
        assert_eq!(reloaded.general.interval_secs, 5);
    }

    #[test]
    fn load_from_nonexistent_file_fails() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let missing = dir.path().join("missing-config.toml");
        let result = AppConfig::load_from(&missing);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_toml_fails() {
        let mut tmpfile = tempfile::NamedTempFile::new().expect("create tempfile");
        tmpfile
            .write_all(b"this is not valid toml [[[")
            .expect("write");

        let result = AppConfig::load_from(tmpfile.path());
        assert!(result.is_err());
    }
}
