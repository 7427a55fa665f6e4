//! Core types for locator translation

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::errors::SelectorError;

/// Locator strategy enumeration
///
/// The closed set of Selenium-style ways to identify an element. String
/// names follow the `How` constants used in page-object annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    /// Whole token of the `class` attribute
    ClassName,

    /// CSS selector, compiled by the CSS collaborator
    Css,

    Id,

    Name,

    /// `id` or `name` attribute
    IdOrName,

    /// Element name, inserted as a raw node test
    TagName,

    /// Anchor with `href` whose normalized text equals the value
    LinkText,

    /// Form control associated with a `<label>` by text
    Label,

    /// Anchor with `href` whose normalized text contains the value
    PartialLinkText,

    /// Complete XPath expression, returned verbatim
    #[serde(rename = "xpath")]
    XPath,
}

impl StrategyKind {
    /// All strategies in declaration order
    pub const ALL: [StrategyKind; 10] = [
        StrategyKind::ClassName,
        StrategyKind::Css,
        StrategyKind::Id,
        StrategyKind::Name,
        StrategyKind::IdOrName,
        StrategyKind::TagName,
        StrategyKind::LinkText,
        StrategyKind::Label,
        StrategyKind::PartialLinkText,
        StrategyKind::XPath,
    ];

    /// Get strategy name as string
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::ClassName => "className",
            StrategyKind::Css => "css",
            StrategyKind::Id => "id",
            StrategyKind::Name => "name",
            StrategyKind::IdOrName => "idOrName",
            StrategyKind::TagName => "tagName",
            StrategyKind::LinkText => "linkText",
            StrategyKind::Label => "label",
            StrategyKind::PartialLinkText => "partialLinkText",
            StrategyKind::XPath => "xpath",
        }
    }

    /// Whether the value is spliced into the output without escaping.
    ///
    /// `tagName` and `xpath` values are trusted fragments: the caller must
    /// supply a valid node test or a valid expression respectively.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, StrategyKind::TagName | StrategyKind::XPath)
    }

    /// One-line description of what the strategy selects
    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::ClassName => "elements whose class list contains the value",
            StrategyKind::Css => "elements matching the CSS selector",
            StrategyKind::Id => "elements whose id equals the value",
            StrategyKind::Name => "elements whose name equals the value",
            StrategyKind::IdOrName => "elements whose id or name equals the value",
            StrategyKind::TagName => "elements with the given tag name",
            StrategyKind::LinkText => "links whose text equals the value",
            StrategyKind::Label => "form controls labelled with the value",
            StrategyKind::PartialLinkText => "links whose text contains the value",
            StrategyKind::XPath => "nodes matching the XPath expression",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SelectorError::UnsupportedStrategy(s.to_string()))
    }
}

/// What to do with a locator mapping holding more than one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiKeyPolicy {
    /// Treat the locator as malformed
    #[default]
    Reject,

    /// Use the first entry and ignore the rest
    FirstEntry,
}

impl FromStr for MultiKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(MultiKeyPolicy::Reject),
            "first_entry" | "first-entry" | "first" => Ok(MultiKeyPolicy::FirstEntry),
            other => Err(format!("unknown multi-key policy '{other}'")),
        }
    }
}

/// A single (strategy, value) pair
///
/// Serialized as a one-entry mapping, e.g. `{"id": "login"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    strategy: StrategyKind,
    value: String,
}

impl Locator {
    pub fn new(strategy: StrategyKind, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Build from a strategy name, failing on unknown names
    pub fn from_pair(strategy: &str, value: impl Into<String>) -> Result<Self, SelectorError> {
        Ok(Self::new(strategy.parse()?, value))
    }

    /// Decompose an untyped single-entry mapping such as `{"css": "a.btn"}`.
    pub fn from_json(locator: &Value, policy: MultiKeyPolicy) -> Result<Self, SelectorError> {
        let Value::Object(map) = locator else {
            return Err(SelectorError::malformed(format!(
                "expected a single-entry mapping, got {}",
                json_kind(locator)
            )));
        };

        let Some((strategy, value)) = map.iter().next() else {
            return Err(SelectorError::malformed("locator mapping is empty"));
        };

        if map.len() > 1 {
            match policy {
                MultiKeyPolicy::Reject => {
                    return Err(SelectorError::malformed(format!(
                        "expected exactly one strategy, got {}",
                        map.len()
                    )))
                }
                MultiKeyPolicy::FirstEntry => {
                    debug!(
                        strategy = %strategy,
                        ignored = map.len() - 1,
                        "using first entry of multi-key locator"
                    );
                }
            }
        }

        let Value::String(value) = value else {
            return Err(SelectorError::malformed(format!(
                "value for \"{strategy}\" must be a string, got {}",
                json_kind(value)
            )));
        };

        Self::from_pair(strategy, value.as_str())
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Value exactly as supplied
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Value used for translation: trimmed, except for raw XPath
    pub fn effective_value(&self) -> &str {
        match self.strategy {
            StrategyKind::XPath => &self.value,
            _ => self.value.trim(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.strategy.name(), &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Locator::from_json(&value, MultiKeyPolicy::Reject).map_err(serde::de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
