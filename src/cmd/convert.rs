//! Convert command implementation
//!
//! Resolves configuration (flag, then config file, then defaults), runs the
//! converter and prints the summary.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigLoader, ConverterConfig};
use crate::converter;
use crate::report::{print_summary, ConversionReport};

/// Options accepted by the convert command
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Threshold override in bytes
    pub max_size: Option<usize>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Print the report as JSON instead of the summary
    pub json: bool,
    /// Print nothing on success
    pub quiet: bool,
    /// Use ASCII fallbacks instead of emoji
    pub no_emoji: bool,
}

/// Convert `input` into `output`
///
/// # Examples
///
/// ```no_run
/// use css_datauri::cmd::convert::{cmd_convert, ConvertOptions};
/// use std::path::Path;
///
/// cmd_convert(Path::new("style.css"), Path::new("style.min.css"), &ConvertOptions::default())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file is missing (when given explicitly) or invalid
/// - A referenced resource cannot be fetched
/// - A `url(` token is never closed
/// - The input cannot be read or the output cannot be written
pub fn cmd_convert(input: &Path, output: &Path, options: &ConvertOptions) -> Result<ConversionReport> {
    let config = resolve_config(options)?;
    let report = converter::run(input, output, config)?;

    if options.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else if !options.quiet {
        print_summary(&report, output, options.no_emoji);
    }

    Ok(report)
}

fn resolve_config(options: &ConvertOptions) -> Result<ConverterConfig> {
    let file = match &options.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => {
            let cwd = env::current_dir().context("Failed to determine current directory")?;
            ConfigLoader::load(&cwd)?
        }
    };

    let config = ConverterConfig::from_file(&file)?;
    match options.max_size {
        Some(bytes) => Ok(config.with_threshold(bytes)?),
        None => Ok(config),
    }
}
