use clap::Parser;
use log::{error, info};

use yolo2kitti::{load_font, visualize_yolo, Palette, VisualizeYoloArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = VisualizeYoloArgs::parse();

    if !args.image_folder.exists() {
        error!(
            "The specified image folder does not exist: {}",
            args.image_folder.display()
        );
        return;
    }

    // Colors are fixed by the seed so reruns draw the same picture
    let palette = Palette::new(args.seed, args.class_names.len());
    let font = load_font(&args.font);

    info!("Drawing YOLO labels from {}", args.label_folder.display());
    match visualize_yolo(
        &args.image_folder,
        &args.label_folder,
        args.output_folder.as_deref(),
        &args.class_names,
        &args.image_ext,
        &palette,
        font.as_ref(),
    ) {
        Ok(stats) => stats.print_summary(),
        Err(e) => error!("Failed to set up the overlay folder: {}", e),
    }
}
