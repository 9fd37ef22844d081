//! tessera: pixelate an image into uniform color blocks and write a
//! DPI-tagged PNG.
//!
//! Thin shell around `tessera-pipeline` and `tessera-export`: reads the
//! input file, runs the mosaic pipeline, and writes the PNG atomically
//! (temp file + rename) so a failed run never leaves a partial file
//! under the output name.

#![allow(clippy::print_stderr)]

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tessera_pipeline::{DownFilter, MosaicConfig, SizingMode, UpFilter};

/// Pixelate an image into uniform color blocks and write a DPI-tagged PNG.
///
/// The output keeps the input's pixel dimensions; only the block
/// structure changes. Input may be PNG, JPEG, GIF, or WebP.
#[derive(Parser)]
#[command(name = "tessera", version)]
struct Args {
    /// Input image path.
    input: PathBuf,

    /// Output PNG path.
    #[arg(short, long)]
    output: PathBuf,

    /// Block side length in pixels (1-500).
    ///
    /// Required with `--mode manual`; overrides the computed size with
    /// `--mode auto`.
    #[arg(long)]
    block: Option<u32>,

    /// Block sizing mode.
    #[arg(long, value_enum, default_value_t = Mode::Auto)]
    mode: Mode,

    /// Down-sampling filter: how a block's pixels collapse to one color.
    #[arg(long, value_enum, default_value_t = Down::Triangle)]
    down_filter: Down,

    /// Up-sampling filter: how that color expands back across the block.
    #[arg(long, value_enum, default_value_t = Up::Nearest)]
    filter: Up,

    /// Physical print density to record in the PNG metadata.
    #[arg(long, default_value_t = MosaicConfig::DEFAULT_DPI, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    dpi: u32,
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
    /// Center-weighted mean (reduces banding).
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

fn config_from_args(args: &Args) -> MosaicConfig {
    MosaicConfig {
        block: args.block,
        mode: match args.mode {
            Mode::Auto => SizingMode::Auto,
            Mode::Manual => SizingMode::Manual,
        },
        down_filter: match args.down_filter {
            Down::Box => DownFilter::Box,
            Down::Triangle => DownFilter::Triangle,
        },
        up_filter: match args.filter {
            Up::Nearest => UpFilter::Nearest,
            Up::Triangle => UpFilter::Triangle,
        },
        dpi: args.dpi,
    }
}

/// Write `bytes` to `path` via a temp file in the same directory and an
/// atomic rename, so readers never observe a partially written file.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|persist| persist.error)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let config = config_from_args(&args);

    eprintln!("Reading image from {}", args.input.display());
    let bytes = std::fs::read(&args.input)
        .map_err(|error| format!("failed to read {}: {error}", args.input.display()))?;

    let source = tessera_pipeline::decode(&bytes)?;
    let (width, height) = source.dimensions();
    eprintln!("Pixelating {width}x{height} image...");

    let result = tessera_pipeline::process(&source, &config)?;
    let png = tessera_export::to_png(&result.image, config.dpi)?;

    eprintln!(
        "Writing {} bytes to {}",
        png.len(),
        args.output.display(),
    );
    write_atomically(&args.output, &png)
        .map_err(|error| format!("failed to write {}: {error}", args.output.display()))?;

    eprintln!("Done.");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn args_map_onto_pipeline_config() {
        let args = Args {
            input: PathBuf::from("in.png"),
            output: PathBuf::from("out.png"),
            block: Some(25),
            mode: Mode::Manual,
            down_filter: Down::Box,
            filter: Up::Nearest,
            dpi: 150,
        };
        let config = config_from_args(&args);
        assert_eq!(config.block, Some(25));
        assert_eq!(config.mode, SizingMode::Manual);
        assert_eq!(config.down_filter, DownFilter::Box);
        assert_eq!(config.up_filter, UpFilter::Nearest);
        assert_eq!(config.dpi, 150);
    }

    #[test]
    fn defaults_match_the_pipeline_defaults() {
        let args = Args::parse_from(["tessera", "in.png", "-o", "out.png"]);
        assert_eq!(config_from_args(&args), MosaicConfig::default());
    }

    #[test]
    fn atomic_write_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_atomically(&path, b"payload").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }

    #[test]
    fn atomic_write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"old").unwrap();
        write_atomically(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
