//! Command handlers
//!
//! Each handler returns a serializable report; [`render`] turns it into
//! text for the selected [`OutputFormat`].

use anyhow::{bail, Context, Result};
use selenium_selector::{
    Locator, SelectorsHandler, SeleniumSelector, StrategyKind, SELENIUM_ENGINE,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{Config, LoadedConfig, OutputFormat};

/// Plain-text form of a report, used for `--output human`
pub trait HumanReadable {
    fn human(&self) -> String;
}

pub fn render<T: Serialize + HumanReadable>(report: &T, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Human => report.human(),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Yaml => serde_yaml::to_string(report)?,
    };
    Ok(text.trim_end().to_string())
}

#[derive(Debug, Serialize)]
pub struct Translation {
    pub strategy: StrategyKind,
    pub value: String,
    pub xpath: String,
}

impl HumanReadable for Translation {
    fn human(&self) -> String {
        self.xpath.clone()
    }
}

/// Translate either a `STRATEGY VALUE` pair or a JSON locator mapping.
pub fn translate(
    selector: &SeleniumSelector,
    strategy: Option<&str>,
    value: Option<&str>,
    locator_json: Option<&str>,
) -> Result<Translation> {
    let locator = match (strategy, value, locator_json) {
        (_, _, Some(raw)) => {
            let json: Value = serde_json::from_str(raw).context("--locator is not valid JSON")?;
            Locator::from_json(&json, selector.multi_key_policy())?
        }
        (Some(strategy), Some(value), None) => Locator::from_pair(strategy, value)?,
        (Some(_), None, None) => bail!("Missing locator value"),
        _ => bail!("Provide STRATEGY VALUE or --locator '<json>'"),
    };

    debug!(locator = %locator, "translate");
    let xpath = selector.translate_to_xpath(&locator)?;

    Ok(Translation {
        strategy: locator.strategy(),
        value: locator.value().to_string(),
        xpath,
    })
}

#[derive(Debug, Serialize)]
pub struct EscapedLiteral {
    pub raw: String,
    pub literal: String,
}

impl HumanReadable for EscapedLiteral {
    fn human(&self) -> String {
        self.literal.clone()
    }
}

pub fn escape(raw: &str) -> EscapedLiteral {
    EscapedLiteral {
        raw: raw.to_string(),
        literal: xpath_escaper::escape_literal(raw),
    }
}

#[derive(Debug, Serialize)]
pub struct CompiledCss {
    pub selector: String,
    pub xpath: String,
}

impl HumanReadable for CompiledCss {
    fn human(&self) -> String {
        self.xpath.clone()
    }
}

pub fn css(config: &Config, selector: &str) -> Result<CompiledCss> {
    let xpath = config
        .css_translator()
        .css_to_xpath(selector)
        .with_context(|| format!("Invalid CSS selector '{}'", selector))?;
    Ok(CompiledCss {
        selector: selector.to_string(),
        xpath,
    })
}

#[derive(Debug, Serialize)]
pub struct StrategyInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub passthrough: bool,
    /// Output for the placeholder value `VALUE`
    pub shape: String,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct StrategyList(pub Vec<StrategyInfo>);

impl HumanReadable for StrategyList {
    fn human(&self) -> String {
        let width = self.0.iter().map(|info| info.name.len()).max().unwrap_or(0);
        self.0
            .iter()
            .map(|info| {
                format!(
                    "{:<width$}  {}\n{:<width$}  {}",
                    info.name,
                    info.description,
                    "",
                    info.shape,
                    width = width
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn strategies(selector: &SeleniumSelector) -> Result<StrategyList> {
    StrategyKind::ALL
        .into_iter()
        .map(|kind| -> Result<StrategyInfo> {
            let shape = selector.translate_to_xpath(&Locator::new(kind, "VALUE"))?;
            Ok(StrategyInfo {
                name: kind.name(),
                description: kind.description(),
                passthrough: kind.is_passthrough(),
                shape,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(StrategyList)
}

#[derive(Debug, Serialize)]
pub struct EngineTranslation {
    pub engine: String,
    pub locator: Value,
    pub xpath: String,
}

impl HumanReadable for EngineTranslation {
    fn human(&self) -> String {
        self.xpath.clone()
    }
}

/// Run `locator` through the engine registered as `name`.
///
/// The locator is read as JSON for the `se` engine or when `json` is set,
/// and taken as a plain string otherwise.
pub fn engine(
    handler: &SelectorsHandler,
    name: &str,
    locator: &str,
    json: bool,
) -> Result<EngineTranslation> {
    let locator = if json || name == SELENIUM_ENGINE {
        serde_json::from_str(locator).context("Locator is not valid JSON")?
    } else {
        Value::String(locator.to_string())
    };
    let xpath = handler.selector_to_xpath(name, &locator)?;
    Ok(EngineTranslation {
        engine: name.to_string(),
        locator,
        xpath,
    })
}

#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub path: String,
    pub from_file: bool,
    pub config: Config,
}

impl HumanReadable for ConfigReport {
    fn human(&self) -> String {
        let source = if self.from_file { "" } else { " (not found, using defaults)" };
        let body = serde_yaml::to_string(&self.config).unwrap_or_default();
        format!("# {}{}\n{}", self.path, source, body)
    }
}

pub fn config_show(loaded: &LoadedConfig) -> ConfigReport {
    ConfigReport {
        path: loaded.path.display().to_string(),
        from_file: loaded.from_file,
        config: loaded.config.clone(),
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigPath(pub String);

impl HumanReadable for ConfigPath {
    fn human(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_date: &'static str,
    pub git_commit: &'static str,
    pub strategies: Vec<&'static str>,
    pub engines: Vec<String>,
}

impl HumanReadable for SystemInfo {
    fn human(&self) -> String {
        let lines = vec![
            "QA Selector System Information".to_string(),
            "==============================".to_string(),
            format!("Version: {}", self.version),
            format!("Build Date: {}", self.build_date),
            format!("Git Commit: {}", self.git_commit),
            String::new(),
            format!("Strategies: {}", self.strategies.join(", ")),
            format!("Engines: {}", self.engines.join(", ")),
        ];
        lines.join("\n")
    }
}

pub fn info(handler: &SelectorsHandler) -> SystemInfo {
    SystemInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        git_commit: option_env!("GIT_HASH").unwrap_or("unknown"),
        strategies: StrategyKind::ALL.iter().map(StrategyKind::name).collect(),
        engines: handler.names().map(str::to_string).collect(),
    }
}
