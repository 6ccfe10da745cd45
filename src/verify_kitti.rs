use clap::Parser;
use log::{error, info};

use yolo2kitti::{print_reports, verify, VerifyArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = VerifyArgs::parse();

    info!("Verifying {} folder pair(s)...", args.source_folders.len());
    match verify(&args.source_folders, &args.destination_folders, args.kind) {
        Ok(reports) => print_reports(&reports),
        Err(e) => error!("{}", e),
    }
}
