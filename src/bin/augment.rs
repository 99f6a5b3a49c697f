use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use label_pose::augment::Augmenter;
use label_pose::navigator::list_images;
use label_pose::{logging, Config};

/// Write rotated/scaled copies of every labeled *.jpg in a folder.
#[derive(Parser, Debug)]
#[command(name = "augment", version)]
struct Args {
    /// Folder with source images and their .txt labels.
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// Output folder, created if missing. Defaults to the configured one.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file with the transform list.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?;
    let output = args.output.unwrap_or(config.augment.output_dir);

    let sources = list_images(&args.input)
        .with_context(|| format!("listing {}", args.input.display()))?;
    if sources.is_empty() {
        warn!("no *.jpg images in {}", args.input.display());
        return Ok(());
    }

    let report = Augmenter::new(output, config.augment.transforms).run(&sources)?;
    println!(
        "{} sources, {} skipped, {} image/label pairs written",
        report.sources, report.skipped, report.written
    );
    Ok(())
}
