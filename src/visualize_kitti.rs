use clap::Parser;
use log::{error, info};

use yolo2kitti::{load_font, visualize_kitti, VisualizeKittiArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = VisualizeKittiArgs::parse();

    if !args.image_folder.exists() {
        error!(
            "The specified image folder does not exist: {}",
            args.image_folder.display()
        );
        return;
    }

    let font = load_font(&args.font);

    info!("Drawing KITTI labels from {}", args.kitti_folder.display());
    match visualize_kitti(
        &args.image_folder,
        &args.kitti_folder,
        args.output_folder.as_deref(),
        &args.image_ext,
        font.as_ref(),
    ) {
        Ok(stats) => stats.print_summary(),
        Err(e) => error!("Failed to set up the overlay folder: {}", e),
    }
}
