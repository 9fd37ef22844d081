//! tessera-bench: CLI tool for mosaic parameter experimentation and
//! diagnostics.
//!
//! Runs the mosaic pipeline on a given image file with configurable
//! parameters, printing per-stage durations and grid metrics. Useful
//! for:
//!
//! - Comparing down-sampling filters (`box` vs `triangle`)
//! - Measuring how block size affects throughput and output size
//! - Identifying whether planning or block processing dominates
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin tessera-bench -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tessera_pipeline::{MosaicConfig, MosaicDiagnostics};

/// Mosaic parameter experimentation and diagnostics for tessera.
///
/// Runs the mosaic pipeline on a given image with configurable
/// parameters and prints per-stage timing and grid diagnostics.
#[derive(Parser)]
#[command(name = "tessera-bench", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, GIF, WebP).
    image_path: PathBuf,

    /// Block side length in pixels (1-500); omit for automatic sizing.
    #[arg(long)]
    block: Option<u32>,

    /// Block sizing mode.
    #[arg(long, value_enum, default_value_t = Mode::Auto)]
    mode: Mode,

    /// Down-sampling filter (box, triangle).
    #[arg(long, value_enum, default_value_t = Down::Triangle)]
    down_filter: Down,

    /// Up-sampling filter (nearest, triangle).
    #[arg(long, value_enum, default_value_t = Up::Nearest)]
    filter: Up,

    /// Print density recorded when --out is used.
    #[arg(long, default_value_t = MosaicConfig::DEFAULT_DPI, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    dpi: u32,

    /// Write the mosaic PNG of the first run to this path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Full mosaic config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    /// The JSON must be a valid `MosaicConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Block sizing mode selection.
#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Derive the block size from the image dimensions.
    Auto,
    /// Use the explicit --block value.
    Manual,
}

/// Down-sampling filter selection.
#[derive(Clone, Copy, ValueEnum)]
enum Down {
    /// Equal-weight arithmetic mean.
    Box,
    /// Center-weighted mean.
    Triangle,
}

/// Up-sampling filter selection.
#[derive(Clone, Copy, ValueEnum)]
enum Up {
    /// Hard-edged uniform blocks.
    Nearest,
    /// Accepted for compatibility; behaves as nearest.
    Triangle,
}

/// Build a [`MosaicConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<MosaicConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(MosaicConfig {
        block: cli.block,
        mode: match cli.mode {
            Mode::Auto => tessera_pipeline::SizingMode::Auto,
            Mode::Manual => tessera_pipeline::SizingMode::Manual,
        },
        down_filter: match cli.down_filter {
            Down::Box => tessera_pipeline::DownFilter::Box,
            Down::Triangle => tessera_pipeline::DownFilter::Triangle,
        },
        up_filter: match cli.filter {
            Up::Nearest => tessera_pipeline::UpFilter::Nearest,
            Up::Triangle => tessera_pipeline::UpFilter::Triangle,
        },
        dpi: cli.dpi,
    })
}

/// Format a human-readable per-stage report.
fn report(diagnostics: &MosaicDiagnostics) -> String {
    let summary = &diagnostics.summary;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "image    : {}x{}",
        summary.dimensions.width, summary.dimensions.height,
    );
    let _ = writeln!(
        out,
        "grid     : {}x{} blocks of {}px ({} total)",
        summary.blocks_x, summary.blocks_y, summary.block_size, summary.block_count,
    );
    let _ = writeln!(out, "workers  : {}", summary.workers);
    let _ = writeln!(out, "resolve  : {:>10.3?}", diagnostics.resolve);
    let _ = writeln!(out, "plan     : {:>10.3?}", diagnostics.plan);
    let _ = writeln!(out, "mosaic   : {:>10.3?}", diagnostics.mosaic);
    let _ = writeln!(out, "total    : {:>10.3?}", diagnostics.total);
    out
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let source = match tessera_pipeline::decode(&image_bytes) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error decoding {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Image: {} ({} bytes)",
        cli.image_path.display(),
        image_bytes.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        match tessera_pipeline::process_with_diagnostics(&source, &config) {
            Ok((result, diagnostics)) => {
                if cli.json {
                    match serde_json::to_string_pretty(&diagnostics) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            eprintln!("Error serializing diagnostics: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", report(&diagnostics));
                }

                // Write the PNG on the first run only.
                if run == 0
                    && let Some(ref out_path) = cli.out
                {
                    let png = match tessera_export::to_png(&result.image, config.dpi) {
                        Ok(png) => png,
                        Err(e) => {
                            eprintln!("Error encoding PNG: {e}");
                            return ExitCode::FAILURE;
                        }
                    };
                    if let Err(e) = std::fs::write(out_path, &png) {
                        eprintln!("Error writing {}: {e}", out_path.display());
                        return ExitCode::FAILURE;
                    }
                    eprintln!("PNG written to {} ({} bytes)", out_path.display(), png.len());
                }
            }
            Err(e) => {
                eprintln!("Pipeline error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
