use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use tracing::info;

use label_pose::app::{LabelPoseApp, WINDOW_TITLE};
use label_pose::{logging, Config, ImageSet, Session};

/// Annotate 16-point human poses on a folder of *.jpg images.
#[derive(Parser, Debug)]
#[command(name = "label-pose", version)]
struct Args {
    /// Image directory. A folder picker opens when omitted.
    dir: Option<PathBuf>,

    /// JSON config file (canvas size, guide paths, augmentation).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with the skeleton overlay on.
    #[arg(short, long)]
    skeleton: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    config.show_skeleton |= args.skeleton;

    let dir = match args.dir {
        Some(dir) => dir,
        None => rfd::FileDialog::new()
            .set_title("Select image directory")
            .pick_folder()
            .context("no directory selected")?,
    };
    info!("image directory: {}", dir.display());

    let images = ImageSet::scan(&dir)?;
    let session = Session::open(images, &config).context("no image could be loaded")?;

    let title = format!("{WINDOW_TITLE} — {}", dir.display());
    let guide_width = if session.has_guide() { 2.0 } else { 1.0 };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                config.canvas_width as f32 * guide_width + 40.0,
                config.canvas_height as f32 + 90.0,
            ])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(LabelPoseApp::new(session)))),
    )
    .map_err(|e| anyhow!("failed to run eframe: {e}"))
}
