use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use qa_selector::commands::{self, render, ConfigPath};
use qa_selector::config::{default_config_path, load_config, OutputFormat};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// QA Selector - translate Selenium-style locators into XPath
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (defaults to the configured level)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a locator into XPath
    Translate(TranslateArgs),

    /// Escape a string as an XPath literal
    Escape {
        /// Text to escape
        #[arg(allow_hyphen_values = true)]
        raw: String,
    },

    /// Compile a CSS selector into XPath
    Css {
        /// CSS selector
        #[arg(allow_hyphen_values = true)]
        selector: String,
    },

    /// List supported locator strategies
    Strategies,

    /// Translate a locator with a named selector engine
    Engine {
        /// Engine name (se, css, xpath)
        name: String,

        /// Locator: JSON for the `se` engine, a plain string otherwise
        #[arg(allow_hyphen_values = true)]
        locator: String,

        /// Read the locator as JSON for any engine
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config(ConfigArgs),

    /// Show version and build information
    Info,
}

#[derive(Args)]
struct TranslateArgs {
    /// Strategy name (id, css, linkText, ...)
    #[arg(required_unless_present = "locator")]
    strategy: Option<String>,

    /// Locator value
    #[arg(allow_hyphen_values = true, required_unless_present = "locator")]
    value: Option<String>,

    /// Locator as a single-entry JSON mapping, e.g. '{"id": "login"}'
    #[arg(long, value_name = "JSON", conflicts_with_all = ["strategy", "value"])]
    locator: Option<String>,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let loaded = load_config(cli.config.as_deref())?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| loaded.config.log_level.clone());
    init_logging(&level, cli.debug)?;

    if loaded.from_file {
        info!("Loaded configuration from: {}", loaded.path.display());
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            loaded.path.display()
        );
    }
    for message in &loaded.ignored_overrides {
        warn!("{}", message);
    }

    let config = &loaded.config;
    let output = cli.output.unwrap_or(config.output);

    let text = match cli.command {
        Commands::Translate(args) => render(
            &commands::translate(
                &config.selector(),
                args.strategy.as_deref(),
                args.value.as_deref(),
                args.locator.as_deref(),
            )?,
            output,
        )?,
        Commands::Escape { raw } => render(&commands::escape(&raw), output)?,
        Commands::Css { selector } => render(&commands::css(config, &selector)?, output)?,
        Commands::Strategies => render(&commands::strategies(&config.selector())?, output)?,
        Commands::Engine {
            name,
            locator,
            json,
        } => render(
            &commands::engine(&config.selectors_handler(), &name, &locator, json)?,
            output,
        )?,
        Commands::Config(args) => match args.action {
            ConfigAction::Show => render(&commands::config_show(&loaded), output)?,
            ConfigAction::Path => {
                let path = match &cli.config {
                    Some(path) => path.clone(),
                    None => default_config_path()?,
                };
                render(&ConfigPath(path.display().to_string()), output)?
            }
        },
        Commands::Info => render(&commands::info(&config.selectors_handler()), output)?,
    };

    println!("{}", text);
    debug!("Command completed successfully");
    Ok(())
}

fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
