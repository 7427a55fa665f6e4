//! Named selector engines
//!
//! Page objects refer to locators by engine name (`se`, `css`, `xpath`).
//! The handler maps a name to an engine and each engine turns its locator
//! form into XPath.

use std::collections::BTreeMap;
use std::sync::Arc;

use css_xpath::CssTranslator;
use serde_json::Value;
use tracing::debug;

use crate::errors::SelectorError;
use crate::selector::{CssToXPath, SeleniumSelector};
use crate::types::MultiKeyPolicy;

/// Name of the engine taking `{strategy: value}` mappings
pub const SELENIUM_ENGINE: &str = "se";

/// Engine that converts its locator form into an XPath expression
pub trait SelectorEngine: Send + Sync {
    fn translate_to_xpath(&self, locator: &Value) -> Result<String, SelectorError>;
}

impl<C: CssToXPath> SelectorEngine for SeleniumSelector<C> {
    fn translate_to_xpath(&self, locator: &Value) -> Result<String, SelectorError> {
        self.translate_json(locator)
    }
}

/// Plain CSS selector string
#[derive(Debug, Clone, Default)]
pub struct CssEngine<C = CssTranslator> {
    css: C,
}

impl<C: CssToXPath> CssEngine<C> {
    pub fn new(css: C) -> Self {
        Self { css }
    }
}

impl<C: CssToXPath> SelectorEngine for CssEngine<C> {
    fn translate_to_xpath(&self, locator: &Value) -> Result<String, SelectorError> {
        Ok(self.css.css_to_xpath(expect_string(locator, "css")?)?)
    }
}

/// XPath expression string, returned verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct XPathEngine;

impl SelectorEngine for XPathEngine {
    fn translate_to_xpath(&self, locator: &Value) -> Result<String, SelectorError> {
        expect_string(locator, "xpath").map(str::to_string)
    }
}

fn expect_string<'a>(locator: &'a Value, engine: &str) -> Result<&'a str, SelectorError> {
    locator.as_str().ok_or_else(|| {
        SelectorError::malformed(format!("the \"{engine}\" engine expects a string locator"))
    })
}

/// Registry of selector engines by name
#[derive(Clone)]
pub struct SelectorsHandler {
    engines: BTreeMap<String, Arc<dyn SelectorEngine>>,
}

impl SelectorsHandler {
    /// Create an empty handler
    pub fn new() -> Self {
        Self {
            engines: BTreeMap::new(),
        }
    }

    /// Handler with the `se`, `css` and `xpath` engines sharing one CSS compiler
    pub fn with_defaults<C>(css: C, multi_key: MultiKeyPolicy) -> Self
    where
        C: CssToXPath + Clone + 'static,
    {
        let mut handler = Self::new();
        handler.register(
            SELENIUM_ENGINE,
            SeleniumSelector::with_css_compiler(css.clone()).with_multi_key_policy(multi_key),
        );
        handler.register("css", CssEngine::new(css));
        handler.register("xpath", XPathEngine);
        handler
    }

    /// Register `engine` under `name`, replacing any previous engine
    pub fn register(&mut self, name: impl Into<String>, engine: impl SelectorEngine + 'static) {
        let name = name.into();
        debug!(engine = %name, "registering selector engine");
        self.engines.insert(name, Arc::new(engine));
    }

    pub fn has(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }

    /// Registered engine names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(String::as_str)
    }

    pub fn engine(&self, name: &str) -> Result<Arc<dyn SelectorEngine>, SelectorError> {
        self.engines
            .get(name)
            .cloned()
            .ok_or_else(|| SelectorError::UnknownEngine(name.to_string()))
    }

    /// Translate `locator` with the engine registered as `name`
    pub fn selector_to_xpath(&self, name: &str, locator: &Value) -> Result<String, SelectorError> {
        self.engine(name)?.translate_to_xpath(locator)
    }
}

impl Default for SelectorsHandler {
    fn default() -> Self {
        Self::with_defaults(CssTranslator::default(), MultiKeyPolicy::default())
    }
}

impl std::fmt::Debug for SelectorsHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorsHandler")
            .field("engines", &self.engines.keys().collect::<Vec<_>>())
            .finish()
    }
}
