//! Loader configuration.
//!
//! Handles loading, validating, and merging a `loader.toml` file on top of
//! the stock defaults. Every key is optional; a file only needs the values
//! it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [images]
//! eager_leading = 2          # First N discovered images load eagerly
//! default_size_adjust = ""   # Rule set used when data-size-adjust is absent
//! settle_ms = 40             # Pause after load before measuring the box
//!
//! [resize]
//! quiet_ms = 500             # Resize burst ends after this much quiet
//! max_wait_ms = 1000         # ...or after this long, whichever comes first
//!
//! [discovery]
//! poll_step_ms = 25          # Polling fallback: round N sleeps N * step
//! poll_max_rounds = 50       # Cap on N
//!
//! [formmail]
//! endpoint_root = "https://ws.micx.de"
//! subscription_id = ""
//! prevent_enter_submit = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::size_adjust::SizeAdjustRules;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Loader configuration loaded from `loader.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Per-image loading behavior.
    pub images: ImagesConfig,
    /// Viewport resize handling.
    pub resize: ResizeConfig,
    /// Polling discovery fallback.
    pub discovery: DiscoveryConfig,
    /// Form mail submission.
    pub formmail: FormmailConfig,
}

impl LoaderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = SizeAdjustRules::parse(Some(&self.images.default_size_adjust)) {
            return Err(ConfigError::Validation(format!(
                "images.default_size_adjust: {e}"
            )));
        }
        if self.resize.quiet_ms > self.resize.max_wait_ms {
            return Err(ConfigError::Validation(
                "resize.quiet_ms must not exceed resize.max_wait_ms".into(),
            ));
        }
        if self.discovery.poll_step_ms == 0 || self.discovery.poll_max_rounds == 0 {
            return Err(ConfigError::Validation(
                "discovery.poll_step_ms and discovery.poll_max_rounds must be non-zero".into(),
            ));
        }
        if self.formmail.endpoint_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "formmail.endpoint_root must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The configured default size-adjust rules. Empty when unset or, since
    /// `validate` already rejects bad values, unparsable.
    pub fn default_size_adjust(&self) -> SizeAdjustRules {
        SizeAdjustRules::parse(Some(&self.images.default_size_adjust)).unwrap_or_default()
    }
}

/// Per-image loading behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Images with a discovery index below this load eagerly when they carry
    /// no `loading` attribute (above-the-fold / LCP candidates).
    pub eager_leading: u64,
    /// Size-adjust rule set applied when an image has no `data-size-adjust`.
    pub default_size_adjust: String,
    /// Milliseconds to let reflow finish before the box is measured.
    pub settle_ms: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            eager_leading: 2,
            default_size_adjust: String::new(),
            settle_ms: 40,
        }
    }
}

impl ImagesConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Debounce window for viewport resize bursts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub quiet_ms: u64,
    pub max_wait_ms: u64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            quiet_ms: 500,
            max_wait_ms: 1000,
        }
    }
}

/// Back-off for hosts without mutation observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub poll_step_ms: u64,
    pub poll_max_rounds: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            poll_step_ms: 25,
            poll_max_rounds: 50,
        }
    }
}

/// Form mail endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormmailConfig {
    /// Service root; the send endpoint lives under `/v1/formmailer/send`.
    pub endpoint_root: String,
    pub subscription_id: String,
    /// Swallow Enter in single-line inputs of managed forms.
    pub prevent_enter_submit: bool,
}

impl Default for FormmailConfig {
    fn default() -> Self {
        Self {
            endpoint_root: "https://ws.micx.de".to_string(),
            subscription_id: String::new(),
            prevent_enter_submit: true,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(LoaderConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse TOML text, merge it over the defaults and validate.
pub fn parse_config(content: &str) -> Result<LoaderConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let config: LoaderConfig = merge_toml(stock_defaults_value(), overlay).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<LoaderConfig, ConfigError> {
    if !path.exists() {
        return Ok(LoaderConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `loader.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# CDN Image Loader Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Image loading
# ---------------------------------------------------------------------------
[images]
# Images discovered first (index below this) load eagerly when they carry no
# loading attribute, so above-the-fold images are not deferred.
eager_leading = 2

# Size-adjust rule set applied when an image has no data-size-adjust attribute.
# Syntax: "2" or ":2;480:1.5;1200:1" (breakpoint:scale, ":" = default).
default_size_adjust = ""

# Milliseconds to wait after an image has loaded before measuring its box.
settle_ms = 40

# ---------------------------------------------------------------------------
# Viewport resize
# ---------------------------------------------------------------------------
[resize]
# A resize burst is handled once it has been quiet for quiet_ms, or at the
# latest max_wait_ms after it started.
quiet_ms = 500
max_wait_ms = 1000

# ---------------------------------------------------------------------------
# Polling discovery (hosts without mutation observation)
# ---------------------------------------------------------------------------
[discovery]
# Round N waits N * poll_step_ms, N capped at poll_max_rounds.
poll_step_ms = 25
poll_max_rounds = 50

# ---------------------------------------------------------------------------
# Form mail
# ---------------------------------------------------------------------------
[formmail]
endpoint_root = "https://ws.micx.de"
subscription_id = ""
# Swallow Enter in single-line inputs so forms are only sent via the button.
prevent_enter_submit = true
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_values() {
        let config = LoaderConfig::default();
        assert_eq!(config.images.eager_leading, 2);
        assert_eq!(config.images.settle(), Duration::from_millis(40));
        assert_eq!(config.resize.quiet_ms, 500);
        assert_eq!(config.resize.max_wait_ms, 1000);
        assert_eq!(config.discovery.poll_step_ms, 25);
        assert!(config.formmail.prevent_enter_submit);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
[images]
eager_leading = 4
"#,
        )
        .unwrap();
        assert_eq!(config.images.eager_leading, 4);
        assert_eq!(config.images.settle_ms, 40);
        assert_eq!(config.resize, ResizeConfig::default());
    }

    #[test]
    fn parse_size_adjust_default() {
        let config = parse_config(
            r#"
[images]
default_size_adjust = ":2;768:1"
"#,
        )
        .unwrap();
        assert_eq!(config.default_size_adjust().resolve(320.0), 2.0);
        assert_eq!(config.default_size_adjust().resolve(1024.0), 1.0);
    }

    #[test]
    fn invalid_size_adjust_rejected() {
        let err = parse_config(
            r#"
[images]
default_size_adjust = "600=2"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("600=2"));
    }

    #[test]
    fn quiet_longer_than_max_wait_rejected() {
        let err = parse_config(
            r#"
[resize]
quiet_ms = 2000
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn zero_poll_step_rejected() {
        let err = parse_config("[discovery]\npoll_step_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = parse_config("[images]\neager = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(parse_config("[thumbnails]\nsize = 3\n").is_err());
    }

    #[test]
    fn invalid_toml_is_error() {
        assert!(matches!(
            parse_config("[images\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_missing_file_is_default() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("loader.toml")).unwrap();
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[formmail]\nsubscription_id = \"sub-42\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.formmail.subscription_id, "sub-42");
        assert_eq!(config.formmail.endpoint_root, "https://ws.micx.de");
    }

    #[test]
    fn merge_toml_nested_override() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config = parse_config(stock_config_toml()).unwrap();
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let toml = stock_config_toml();
        for section in ["[images]", "[resize]", "[discovery]", "[formmail]"] {
            assert!(toml.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_is_table() {
        assert!(stock_defaults_value().is_table());
    }
}
