use clap::Parser;
use std::path::PathBuf;
use std::process;
use css_datauri::cmd::{self, ConvertOptions};

/// Inline small stylesheet images as base64 data URIs
///
/// Every `url(...)` reference to a .gif, .png, .jpg or .jpeg resource no larger
/// than the size threshold is replaced by a data URI. Local references resolve
/// against the input stylesheet's directory; http:// references are fetched.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Stylesheet to read
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// File to write (overwritten)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Largest resource to inline, in bytes (default 2048)
    #[arg(long, value_name = "BYTES")]
    max_size: Option<usize>,

    /// Configuration file (default: .css-datauri.toml in the current directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the conversion report as JSON
    #[arg(long, conflicts_with = "quiet")]
    json: bool,

    /// Print nothing on success
    #[arg(short, long)]
    quiet: bool,

    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long)]
    no_emoji: bool,
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    let options = ConvertOptions {
        max_size: cli.max_size,
        config: cli.config,
        json: cli.json,
        quiet: cli.quiet,
        no_emoji: cli.no_emoji,
    };

    if let Err(e) = cmd::cmd_convert(&cli.input, &cli.output, &options) {
        use css_datauri::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        process::exit(ErrorFormatter::exit_code(&e));
    }
}
