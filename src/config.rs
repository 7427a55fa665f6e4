//! Configuration management
//!
//! Settings come from a YAML file, then `QA_SELECTOR_*` environment
//! variables, then command-line flags. Every field has a default, so a
//! missing file or a partial one is fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use css_xpath::CssTranslator;
use selenium_selector::{MultiKeyPolicy, SeleniumSelector, SelectorsHandler};
use serde::{Deserialize, Serialize};

pub const ENV_MULTI_KEY: &str = "QA_SELECTOR_MULTI_KEY";
pub const ENV_CSS_HTML: &str = "QA_SELECTOR_CSS_HTML";

/// Output format for command results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level used when neither `RUST_LOG` nor `--log-level` is set
    pub log_level: String,

    pub output: OutputFormat,

    /// Handling of locator mappings with more than one entry
    pub multi_key: MultiKeyPolicy,

    pub css: CssConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            output: OutputFormat::default(),
            multi_key: MultiKeyPolicy::default(),
            css: CssConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    /// Lowercase element and attribute names (HTML documents)
    pub html: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self { html: true }
    }
}

impl Config {
    pub fn css_translator(&self) -> CssTranslator {
        CssTranslator::default().with_html(self.css.html)
    }

    pub fn selector(&self) -> SeleniumSelector {
        SeleniumSelector::with_css_compiler(self.css_translator())
            .with_multi_key_policy(self.multi_key)
    }

    pub fn selectors_handler(&self) -> SelectorsHandler {
        SelectorsHandler::with_defaults(self.css_translator(), self.multi_key)
    }

    /// Apply `QA_SELECTOR_*` overrides.
    ///
    /// Unparsable values leave the setting unchanged and are returned as
    /// messages for the caller to report.
    pub fn apply_env_overrides(&mut self) -> Vec<String> {
        let mut ignored = Vec::new();

        if let Ok(raw) = std::env::var(ENV_MULTI_KEY) {
            match raw.parse() {
                Ok(policy) => self.multi_key = policy,
                Err(err) => ignored.push(format!("Ignoring {}: {}", ENV_MULTI_KEY, err)),
            }
        }

        if let Ok(raw) = std::env::var(ENV_CSS_HTML) {
            match parse_bool(&raw) {
                Some(html) => self.css.html = html,
                None => ignored.push(format!(
                    "Ignoring {}: expected a boolean, got '{}'",
                    ENV_CSS_HTML, raw
                )),
            }
        }

        ignored
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration together with where it was looked for
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub from_file: bool,

    /// Environment overrides that could not be applied
    pub ignored_overrides: Vec<String>,
}

/// `<config dir>/qa-selector/config.yaml`
pub fn default_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("qa-selector");
    path.push("config.yaml");
    Ok(path)
}

/// Load configuration from `config_path` (or the default location) and
/// apply environment overrides.
///
/// Runs before logging is installed, so reporting the outcome is left to
/// the caller.
pub fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    let (mut config, from_file) = if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        (config, true)
    } else {
        (Config::default(), false)
    };

    let ignored_overrides = config.apply_env_overrides();

    Ok(LoadedConfig {
        config,
        path,
        from_file,
        ignored_overrides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var(ENV_MULTI_KEY);
        std::env::remove_var(ENV_CSS_HTML);
    }

    #[test]
    #[serial]
    fn test_missing_file_uses_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert!(!loaded.from_file);
        assert_eq!(loaded.config, Config::default());
    }

    #[test]
    #[serial]
    fn test_partial_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "multi_key: first_entry\ncss:\n  html: false").unwrap();

        let loaded = load_config(Some(file.path())).unwrap();
        assert!(loaded.from_file);
        assert_eq!(loaded.config.multi_key, MultiKeyPolicy::FirstEntry);
        assert!(!loaded.config.css.html);
        assert_eq!(loaded.config.log_level, "info");
        assert_eq!(loaded.config.output, OutputFormat::Human);
    }

    #[test]
    #[serial]
    fn test_invalid_file_is_an_error() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "multi_key: sometimes").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var(ENV_MULTI_KEY, "first-entry");
        std::env::set_var(ENV_CSS_HTML, "off");

        let mut config = Config::default();
        assert!(config.apply_env_overrides().is_empty());
        assert_eq!(config.multi_key, MultiKeyPolicy::FirstEntry);
        assert!(!config.css.html);

        std::env::set_var(ENV_CSS_HTML, "maybe");
        let ignored = config.apply_env_overrides();
        assert_eq!(ignored.len(), 1);
        assert!(ignored[0].starts_with("Ignoring QA_SELECTOR_CSS_HTML"));
        assert!(!config.css.html);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_bad_override_is_reported_by_load() {
        clear_env();
        std::env::set_var(ENV_MULTI_KEY, "sometimes");
        let dir = tempfile::tempdir().unwrap();

        let loaded = load_config(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert_eq!(loaded.config.multi_key, MultiKeyPolicy::Reject);
        assert_eq!(loaded.ignored_overrides.len(), 1);
        assert!(loaded.ignored_overrides[0].contains("sometimes"));

        clear_env();
    }

    #[test]
    fn test_css_html_flag_reaches_translator() {
        let mut config = Config::default();
        assert!(config.css_translator().is_html());
        config.css.html = false;
        assert!(!config.css_translator().is_html());
    }
}
