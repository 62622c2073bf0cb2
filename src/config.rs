//! Runtime configuration loaded from TOML.
//!
//! Every field has a default, so a missing file or a partial file is fine. The default
//! location is `<config dir>/fountview/config.toml`; `--config` overrides it.

use crate::error::{FountviewError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bridge: BridgeConfig,
    pub parser: ParserConfig,
    pub ui: UiConfig,
}

/// Parser loading policy for the render bridge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Extra load attempts after the first failure
    pub load_retries: u32,
    /// Backoff unit between attempts; attempt `n` waits `n * retry_backoff_ms`
    pub retry_backoff_ms: u64,
    /// Artificial delay before the parser becomes available
    pub load_delay_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            load_retries: 2,
            retry_backoff_ms: 100,
            load_delay_ms: 0,
        }
    }
}

impl BridgeConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

/// Options handed to the Fountain parser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Largest document the parser accepts, in bytes
    pub max_input_bytes: usize,
    /// Emit `[[notes]]` as `<span class="note">` instead of dropping them
    pub show_notes: bool,
    /// Emit `#sections` and `=synopses`
    pub show_outline: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 8 * 1024 * 1024,
            show_notes: false,
            show_outline: true,
        }
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Input thread poll interval
    pub poll_interval_ms: u64,
    /// How often an open file is checked for modification
    pub watch_interval_ms: u64,
    /// `default` or `monochrome`
    pub theme: ThemeName,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            watch_interval_ms: 500,
            theme: ThemeName::Default,
        }
    }
}

impl UiConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Default,
    Monochrome,
}

impl Config {
    /// Parse configuration from TOML text and validate it.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(raw).map_err(|e| FountviewError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`.
    ///
    /// An explicit path must exist. The implicit default path falls back to defaults
    /// when nothing is there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(FountviewError::FileNotFound { path });
            }
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|e| {
            FountviewError::file_error(format!("Failed to read {}", path.display()), e)
        })?;
        let config = Self::from_toml_str(&raw)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.parser.max_input_bytes == 0 {
            return Err(FountviewError::config(
                "parser.max_input_bytes must be greater than zero",
            ));
        }
        if self.ui.poll_interval_ms == 0 || self.ui.watch_interval_ms == 0 {
            return Err(FountviewError::config(
                "ui intervals must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// `<config dir>/fountview/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fountview").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [bridge]
            load_retries = 5

            [ui]
            theme = "monochrome"
            "#,
        )
        .unwrap();

        assert_eq!(config.bridge.load_retries, 5);
        assert_eq!(config.bridge.retry_backoff_ms, 100);
        assert_eq!(config.ui.theme, ThemeName::Monochrome);
        assert_eq!(config.parser, ParserConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[bridge]\nretries = 1\n").unwrap_err();
        assert!(matches!(err, FountviewError::ConfigError { .. }));
    }

    #[test]
    fn zero_limits_fail_validation() {
        let err = Config::from_toml_str("[parser]\nmax_input_bytes = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_input_bytes"));
    }

    #[test]
    fn load_reads_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[parser]\nshow_notes = true").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.parser.show_notes);
    }

    #[test]
    fn load_rejects_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, FountviewError::FileNotFound { .. }));
    }
}
