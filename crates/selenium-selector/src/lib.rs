//! Selenium locator translation
//!
//! Turns `{strategy: value}` locators into XPath 1.0 expressions:
//! - attribute strategies (`id`, `name`, `idOrName`, `className`)
//! - text strategies (`linkText`, `partialLinkText`, `label`)
//! - `css`, compiled through a pluggable CSS compiler
//! - `tagName` and `xpath`, spliced in raw

pub mod engines;
pub mod errors;
pub mod selector;
pub mod strategies;
pub mod types;

pub use engines::*;
pub use errors::*;
pub use selector::*;
pub use types::*;
pub use xpath_escaper::escape_literal;
