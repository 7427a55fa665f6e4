//! Locator translator

use css_xpath::{CssError, CssTranslator};
use serde_json::Value;
use tracing::trace;

use crate::errors::SelectorError;
use crate::strategies;
use crate::types::{Locator, MultiKeyPolicy, StrategyKind};

/// CSS compiler seam
///
/// `css` locators are handed over verbatim and the output is returned
/// unchanged; invalid CSS is whatever the implementation says it is.
pub trait CssToXPath: Send + Sync {
    fn css_to_xpath(&self, css: &str) -> Result<String, CssError>;
}

impl CssToXPath for CssTranslator {
    fn css_to_xpath(&self, css: &str) -> Result<String, CssError> {
        CssTranslator::css_to_xpath(self, css)
    }
}

/// Translates Selenium-style locators into XPath.
///
/// Stateless apart from its configuration; one instance can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct SeleniumSelector<C = CssTranslator> {
    css: C,
    multi_key: MultiKeyPolicy,
}

impl SeleniumSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: CssToXPath> SeleniumSelector<C> {
    /// Create a selector delegating `css` locators to `css`
    pub fn with_css_compiler(css: C) -> Self {
        Self {
            css,
            multi_key: MultiKeyPolicy::default(),
        }
    }

    /// Set how multi-entry mappings are handled by [`Self::translate_json`]
    pub fn with_multi_key_policy(mut self, policy: MultiKeyPolicy) -> Self {
        self.multi_key = policy;
        self
    }

    pub fn multi_key_policy(&self) -> MultiKeyPolicy {
        self.multi_key
    }

    /// Translate a typed locator.
    ///
    /// Only `css` locators can fail, when the CSS compiler rejects them.
    pub fn translate_to_xpath(&self, locator: &Locator) -> Result<String, SelectorError> {
        let value = locator.effective_value();
        trace!(strategy = %locator.strategy(), "translating locator");

        let xpath = match locator.strategy() {
            StrategyKind::ClassName => strategies::class_name(value),
            StrategyKind::Css => self.css.css_to_xpath(value)?,
            StrategyKind::Id => strategies::id(value),
            StrategyKind::Name => strategies::name(value),
            StrategyKind::IdOrName => strategies::id_or_name(value),
            StrategyKind::TagName => strategies::tag_name(value),
            StrategyKind::LinkText => strategies::link_text(value),
            StrategyKind::Label => strategies::label(value),
            StrategyKind::PartialLinkText => strategies::partial_link_text(value),
            StrategyKind::XPath => value.to_string(),
        };

        Ok(xpath)
    }

    /// Translate an untyped single-entry mapping, e.g. `{"id": "login"}`.
    pub fn translate_json(&self, locator: &Value) -> Result<String, SelectorError> {
        let locator = Locator::from_json(locator, self.multi_key)?;
        self.translate_to_xpath(&locator)
    }
}
