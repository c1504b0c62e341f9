//! Pivotgrid CLI - Reshape query results into grid tables
//!
//! Usage:
//!   pivotgrid transform <input.json> [--pivot <key>]... [--transpose] [--max-columns <n>]
//!   pivotgrid config [--config <file>]
//!
//! Examples:
//!   pivotgrid transform result.json --pivot month --pretty
//!   pivotgrid transform result.json --transpose
//!   pivotgrid config

use clap::{Parser, Subcommand};
use pivotgrid::config::{Settings, SettingsError};
use pivotgrid::model::{Dimension, DimensionLike, Metric, Reference, ResultTableDocument};
use pivotgrid::modifier::Rollup;
use pivotgrid::ReactTable;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pivotgrid")]
#[command(about = "Pivotgrid - Reshape dimensional query results into grid tables")]
#[command(version)]
struct Cli {
    /// Log pipeline steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a result document into grid columns and data
    Transform {
        /// Path to the JSON input document
        file: PathBuf,

        /// Dimension to move onto the column axis (repeatable)
        #[arg(short, long)]
        pivot: Vec<String>,

        /// Swap the row and column axes
        #[arg(short, long)]
        transpose: bool,

        /// Keep only the first N columns
        #[arg(short, long)]
        max_columns: Option<usize>,

        /// Settings file (defaults to the usual lookup)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective settings as TOML
    Config {
        /// Settings file (defaults to the usual lookup)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Input for `transform`.
#[derive(Deserialize)]
struct InputDocument {
    #[serde(default)]
    dimensions: Vec<Dimension>,
    metrics: Vec<Metric>,
    #[serde(default)]
    references: Vec<Reference>,
    /// Keys of dimensions that carry a totals level.
    #[serde(default)]
    rollup: Vec<String>,
    table: ResultTableDocument,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Transform {
            file,
            pivot,
            transpose,
            max_columns,
            config,
            pretty,
        } => cmd_transform(file, pivot, transpose, max_columns, config, pretty),
        Commands::Config { config } => cmd_config(config),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pivotgrid=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_settings(config: Option<&Path>) -> Result<Settings, SettingsError> {
    match config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn cmd_transform(
    file: PathBuf,
    pivot: Vec<String>,
    transpose: bool,
    max_columns: Option<usize>,
    config: Option<PathBuf>,
    pretty: bool,
) -> ExitCode {
    let settings = match load_settings(config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let input: InputDocument = match serde_json::from_str(&source) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error parsing '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let table = match input.table.into_table() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid table in '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded result table"
    );

    let dimensions: Vec<Box<dyn DimensionLike>> = input
        .dimensions
        .into_iter()
        .map(|d| -> Box<dyn DimensionLike> {
            if input.rollup.contains(&d.key) {
                debug!(dimension = %d.key, "wrapping dimension in rollup");
                Box::new(Rollup::new(d))
            } else {
                Box::new(d)
            }
        })
        .collect();
    let dimension_refs: Vec<&dyn DimensionLike> = dimensions.iter().map(|d| &**d).collect();

    let mut widget = ReactTable::new(input.metrics)
        .pivot(pivot)
        .transpose(transpose)
        .with_settings(settings.react_table);
    if let Some(n) = max_columns {
        widget = widget.max_columns(n);
    }

    let output = match widget.transform(&table, &dimension_refs, &input.references) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Transform failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rendered = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    match rendered {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_config(config: Option<PathBuf>) -> ExitCode {
    let settings = match load_settings(config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match settings.to_toml() {
        Ok(toml) => {
            print!("{}", toml);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing settings: {}", e);
            ExitCode::FAILURE
        }
    }
}
