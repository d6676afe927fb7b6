use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use atlas_baker_core::archive::{ArchiveSource, MemorySource, ZipSource};
use atlas_baker_core::export::{save_canvas, save_mapping};
use atlas_baker_core::pipeline::{build_sprite_atlas, build_tile_atlas};
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "atlas-baker",
    about = "Bake archived tiles/sprites into a texture atlas",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a tile atlas (keys are integer tile indices)
    Tiles(BuildArgs),
    /// Build a sprite atlas (keys are sprite/model/remap triples)
    Sprites(BuildArgs),
}

#[derive(Parser, Debug, Clone)]
struct BuildArgs {
    /// Zip archive (or directory treated as one) holding the source images
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Path prefix inside the archive; only entries under it are packed
    #[arg(long, default_value = "", help_heading = "Input/Output")]
    prefix: String,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Atlas base name (files will be name.png/.json)
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Tiles(args) => run_build(args, Variant::Tiles),
        Commands::Sprites(args) => run_build(args, Variant::Sprites),
    }
}

#[derive(Debug, Clone, Copy)]
enum Variant {
    Tiles,
    Sprites,
}

fn run_build(args: &BuildArgs, variant: Variant) -> anyhow::Result<()> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;
    let png_path = args.out_dir.join(format!("{}.png", args.name));
    let json_path = args.out_dir.join(format!("{}.json", args.name));

    let mut source = open_source(&args.input)?;
    match variant {
        Variant::Tiles => {
            let out = build_tile_atlas(source.as_mut(), &args.prefix)?;
            info!(
                frames = out.atlas.len(),
                occupancy = %format!("{:.2}%", out.atlas.occupancy() * 100.0),
                "tile atlas built"
            );
            save_canvas(&out.rgba, &png_path)?;
            save_mapping(&out.atlas, &json_path)?;
        }
        Variant::Sprites => {
            let out = build_sprite_atlas(source.as_mut(), &args.prefix)?;
            info!(
                frames = out.atlas.len(),
                occupancy = %format!("{:.2}%", out.atlas.occupancy() * 100.0),
                "sprite atlas built"
            );
            save_canvas(&out.rgba, &png_path)?;
            save_mapping(&out.atlas, &json_path)?;
        }
    }
    info!(png = %png_path.display(), json = %json_path.display(), "artifacts written");
    Ok(())
}

fn open_source(input: &Path) -> anyhow::Result<Box<dyn ArchiveSource>> {
    if input.is_dir() {
        Ok(Box::new(source_from_dir(input)?))
    } else {
        let zip = ZipSource::open(input)
            .with_context(|| format!("open archive {}", input.display()))?;
        Ok(Box::new(zip))
    }
}

/// Treats a directory tree as an archive: files in sorted walk order, with
/// a CRC-32 of the file bytes as the content checksum. Same CRC the zip
/// format stores, so dedup behaves identically across input modes.
fn source_from_dir(root: &Path) -> anyhow::Result<MemorySource> {
    let mut source = MemorySource::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let bytes = fs::read(entry.path())
            .with_context(|| format!("read {}", entry.path().display()))?;
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let path = rel.to_string_lossy().replace('\\', "/");
        let crc = crc32fast::hash(&bytes);
        source.push(path, crc, bytes);
    }
    Ok(source)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
