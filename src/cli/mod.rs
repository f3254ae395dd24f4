//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod audit;
mod normalize;
mod resolve;
mod swatch;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

use crate::config::{load_config, GalleryConfig};

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Find all product JSON files in a directory (recursively).
pub fn find_product_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*.json", dir.display());
    let mut files: Vec<PathBuf> = match glob(&pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(e) => {
            log::warn!("bad search pattern {}: {}", pattern, e);
            Vec::new()
        }
    };
    files.sort();
    files
}

/// inkgrid - resolve colors, inks and thumbnails for product galleries
#[derive(Parser)]
#[command(name = "inkgrid")]
#[command(about = "Resolve shirt colors, print inks and gallery thumbnails for catalog products")]
#[command(version)]
pub struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize color tokens to canonical colors
    Normalize {
        /// Color tokens in any supported spelling
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build the gallery for a product and resolve its main image
    Resolve {
        /// Product JSON file
        product: PathBuf,

        /// Select this size
        #[arg(long)]
        size: Option<String>,

        /// Select this color (any supported spelling)
        #[arg(long)]
        color: Option<String>,

        /// Click this thumbnail slot, e.g. "light/royal-blue"
        #[arg(long)]
        slot: Option<String>,

        /// Path to gallery.toml (default: discovered)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the ink decision for every design of a product
    Classify {
        /// Product JSON file
        product: PathBuf,

        /// Path to gallery.toml (default: discovered)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scan a directory of product files for guessed or undetermined inks
    Audit {
        /// Directory searched recursively for *.json products
        dir: PathBuf,

        /// Exit with an error if any design needed a guess
        #[arg(long)]
        strict: bool,

        /// Path to gallery.toml (default: discovered)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the placeholder swatch of a color to PNG
    Swatch {
        /// Color in any supported spelling
        color: String,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Edge length in pixels
        #[arg(long, default_value = "64", value_parser = clap::value_parser!(u32).range(1..=4096))]
        size: u32,

        /// Path to gallery.toml (default: discovered)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Load configuration, printing errors to stderr.
pub(crate) fn config_or_exit(path: Option<&Path>) -> Result<GalleryConfig, ExitCode> {
    load_config(path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Entry point for the inkgrid CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Normalize { tokens, json } => normalize::run_normalize(&tokens, json),
        Commands::Resolve { product, size, color, slot, config, json } => resolve::run_resolve(
            &product,
            size.as_deref(),
            color.as_deref(),
            slot.as_deref(),
            config.as_deref(),
            json,
        ),
        Commands::Classify { product, config, json } => {
            resolve::run_classify(&product, config.as_deref(), json)
        }
        Commands::Audit { dir, strict, config, json } => {
            audit::run_audit(&dir, strict, config.as_deref(), json)
        }
        Commands::Swatch { color, output, size, config } => {
            swatch::run_swatch(&color, &output, size, config.as_deref())
        }
    }
}
