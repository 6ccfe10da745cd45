use clap::Parser;
use log::{error, info};

use yolo2kitti::{print_reports, run_jobs, verify, ContentKind, ConvertArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ConvertArgs::parse();

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    info!("Starting the conversion process...");
    run_jobs(&config.jobs, &config.class_mapping, &config.image_ext);
    info!("Conversion completed.");

    if !config.verify {
        return;
    }

    let label_dirs: Vec<_> = config.jobs.iter().map(|job| job.label_dir.clone()).collect();
    let output_dirs: Vec<_> = config.jobs.iter().map(|job| job.output_dir.clone()).collect();
    match verify(&label_dirs, &output_dirs, ContentKind::Labels) {
        Ok(reports) => print_reports(&reports),
        Err(e) => error!("{}", e),
    }

    let (image_dirs, image_output_dirs): (Vec<_>, Vec<_>) = config
        .jobs
        .iter()
        .filter_map(|job| {
            job.image_output_dir
                .clone()
                .map(|image_output_dir| (job.image_dir.clone(), image_output_dir))
        })
        .unzip();
    if !image_dirs.is_empty() {
        match verify(&image_dirs, &image_output_dirs, ContentKind::Images) {
            Ok(reports) => print_reports(&reports),
            Err(e) => error!("{}", e),
        }
    }
}
