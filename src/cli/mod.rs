// CLI module for sonotag
//
// Argument parsing, logging setup and output formatting for the binary.

pub mod commands;
pub mod config;
pub mod output;

pub use commands::run;
pub use config::Config;

use anyhow::{Context, Result};
use sonotag::ParseOptions;
use tracing_subscriber::EnvFilter;

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "sonotag=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse limits from `--config`, or the defaults
pub fn load_options(config: &Config) -> Result<ParseOptions> {
    match &config.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
        }
        None => Ok(ParseOptions::default()),
    }
}
