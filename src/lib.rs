//! QA Selector library
//!
//! Configuration and command handlers behind the `qa-selector` binary,
//! exposed for integration testing.

pub mod commands;
pub mod config;

pub use config::{load_config, Config, LoadedConfig, OutputFormat};
pub use selenium_selector::{Locator, SelectorError, SeleniumSelector, StrategyKind};
