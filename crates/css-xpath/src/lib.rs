//! CSS selector to XPath compiler
//!
//! Compiles a CSS Selectors Level 3 subset into XPath 1.0:
//! - type, universal, id, class and attribute selectors
//! - descendant, child, next-sibling and subsequent-sibling combinators
//! - selector groups (`a, b`), compiled to a union
//! - structural pseudo-classes, `:not()` and `:contains()`

pub mod errors;
pub mod parser;
pub mod tokenizer;
pub mod translator;
pub mod xpath;

pub use errors::*;
pub use parser::{
    parse, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, PseudoClass,
    SelectorGroup, SimpleSelector,
};
pub use translator::{CssTranslator, DEFAULT_PREFIX};
pub use xpath::XPathExpr;

/// Compiles `css` with the default (HTML) translator.
pub fn css_to_xpath(css: &str) -> Result<String, CssError> {
    CssTranslator::default().css_to_xpath(css)
}
