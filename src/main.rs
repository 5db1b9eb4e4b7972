//! nxtex CLI - Command-line tool for converting Nintendo Switch textures.
//!
//! This is the main entry point for the nxtex command-line application.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use memmap2::Mmap;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use nxtex::prelude::*;

/// nxtex - BNTX to DDS texture converter
#[derive(Parser)]
#[command(name = "nxtex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log per-texture details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the textures of BNTX files to DDS
    Convert {
        /// BNTX file, or a directory searched recursively for .bntx files
        #[arg(short, long, env = "NXTEX_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "NXTEX_OUTPUT")]
        output: PathBuf,

        /// Only convert textures whose name matches this glob pattern
        #[arg(short, long)]
        filter: Option<String>,

        /// Skip formats that have no DDS FourCC instead of writing them
        #[arg(long)]
        skip_unmapped: bool,
    },

    /// List the textures in a BNTX file
    Info {
        /// BNTX file
        #[arg(short, long, env = "NXTEX_INPUT")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            filter,
            skip_unmapped,
        } => {
            let options = ConvertOptions {
                skip_unmapped_fourcc: skip_unmapped,
            };
            cmd_convert(&input, &output, filter.as_deref(), &options)?;
        }
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init();
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    filter: Option<&str>,
    options: &ConvertOptions,
) -> Result<()> {
    let pattern = filter
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid filter pattern")?;

    if !input.is_dir() {
        let written = convert_file(input, output, pattern.as_ref(), options)?;
        println!("Finished: {} textures written to {}", written, output.display());
        return Ok(());
    }

    let files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("bntx"))
        })
        .collect();

    println!("Converting {} BNTX files from {}...", files.len(), input.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut written = 0;
    let mut errors = 0;

    for path in &files {
        let relative = path.strip_prefix(input).unwrap_or(path);
        let target = output.join(relative.with_extension(""));

        match convert_file(path, &target, pattern.as_ref(), options) {
            Ok(count) => written += count,
            Err(e) => {
                pb.suspend(|| eprintln!("Error converting {}: {:#}", path.display(), e));
                errors += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!(
        "Wrote {} textures in {:?} ({} errors)",
        written,
        start.elapsed(),
        errors
    );

    if errors > 0 {
        bail!("{} of {} files failed to convert", errors, files.len());
    }

    Ok(())
}

/// Convert one BNTX file into `output`, returning the number of DDS files written.
fn convert_file(
    input: &Path,
    output: &Path,
    filter: Option<&glob::Pattern>,
    options: &ConvertOptions,
) -> Result<usize> {
    tracing::info!("reading {}", input.display());

    let mmap = map_file(input)?;
    let conversion = nxtex::convert(&mmap, options)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let mut written = 0;
    for texture in &conversion.textures {
        if filter.is_some_and(|p| !p.matches(&texture.name)) {
            continue;
        }

        let path = output.join(texture.file_name());
        fs::write(&path, texture.to_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("saved {}", path.display());
        written += 1;
    }

    let skipped = conversion.parse_skipped.len() + conversion.skipped.len();
    if skipped > 0 {
        tracing::warn!("{}: {} textures skipped", input.display(), skipped);
    }

    Ok(written)
}

fn cmd_info(input: &Path) -> Result<()> {
    let mmap = map_file(input)?;
    let bntx = Bntx::parse(&mmap).context("Failed to parse BNTX")?;

    println!("File name: {}", bntx.file_name.as_deref().unwrap_or("<unknown>"));
    println!("File size: {}", bntx.file_size);
    println!("Textures:  {}", bntx.texture_count);

    for texture in &bntx.textures {
        let info = texture.info();
        let format = FormatDescriptor::from_raw(info.raw_format)
            .map(|f| f.name.to_string())
            .unwrap_or_else(|| format!("{:#06x}", info.raw_format));

        println!(
            "{:>5}x{:<5} {:<12} {:<12} {:>3} mips {:>10} bytes  {}",
            info.width,
            info.height,
            format,
            info.tile_mode,
            info.mip_count,
            info.image_size,
            info.name
        );
    }

    for skipped in &bntx.skipped {
        println!("  #{} skipped: {}", skipped.index, skipped.reason);
    }

    Ok(())
}

fn map_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map {}", path.display()))?;
    Ok(mmap)
}
