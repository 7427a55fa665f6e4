//! Error types for locator translation

use css_xpath::CssError;
use thiserror::Error;

/// Selector error enumeration
///
/// Translation is deterministic, so none of these are worth retrying; they
/// point at a misconfigured locator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Input is not exactly one (strategy, value) pair
    #[error("Incorrect Selenium selector format: {0}")]
    MalformedLocator(String),

    /// Strategy name outside the supported set
    #[error("Selector type \"{0}\" not yet implemented")]
    UnsupportedStrategy(String),

    /// The CSS compiler rejected a `css` locator
    #[error("Invalid CSS selector: {0}")]
    InvalidCss(#[from] CssError),

    /// No engine registered under this name
    #[error("Selector engine \"{0}\" is not registered")]
    UnknownEngine(String),
}

impl SelectorError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        SelectorError::MalformedLocator(reason.into())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            SelectorError::MalformedLocator(_) => "incorrect_selector",
            SelectorError::UnsupportedStrategy(_) => "unknown_selector",
            SelectorError::InvalidCss(_) => "invalid_css",
            SelectorError::UnknownEngine(_) => "unknown_engine",
        }
    }

    /// Offending strategy name, for [`SelectorError::UnsupportedStrategy`]
    pub fn strategy_name(&self) -> Option<&str> {
        match self {
            SelectorError::UnsupportedStrategy(name) => Some(name),
            _ => None,
        }
    }
}
