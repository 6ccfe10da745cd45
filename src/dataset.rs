use log::{error, info, warn};
use std::path::Path;

use crate::conversion::convert_label_file;
use crate::io::{collect_files_with_extensions, companion_path, copy_with_metadata};
use crate::types::{BatchJob, ClassMapping, ConversionStats, LABEL_EXTENSION};
use crate::utils::{create_output_directory, create_progress_bar};

/// Convert every label file of one job whose image exists.
///
/// Per-file problems are logged and counted; only failing to create the
/// output directories is returned as an error.
pub fn process_job(
    job: &BatchJob,
    mapping: &ClassMapping,
    image_ext: &str,
) -> std::io::Result<ConversionStats> {
    create_output_directory(&job.output_dir)?;
    if let Some(image_output_dir) = &job.image_output_dir {
        create_output_directory(image_output_dir)?;
    }

    let label_files = collect_files_with_extensions(&job.label_dir, &[LABEL_EXTENSION]);
    let mut stats = ConversionStats {
        labels_found: label_files.len(),
        ..Default::default()
    };

    let pb = create_progress_bar(
        label_files.len() as u64,
        &format!("Converting {}", job.label_dir.display()),
    );

    for label_path in &label_files {
        pb.inc(1);
        let Some(file_name) = label_path.file_name() else {
            continue;
        };
        let output_path = job.output_dir.join(file_name);
        let Some(image_path) = companion_path(label_path, &job.image_dir, image_ext) else {
            continue;
        };

        if !image_path.exists() {
            warn!("Image not found for label: {}", label_path.display());
            stats.skipped_missing_image += 1;
            continue;
        }

        match convert_label_file(label_path, &image_path, &output_path, mapping) {
            Ok(_) => stats.labels_converted += 1,
            Err(e) => {
                error!("Skipping label file: {}", e);
                stats.failed_conversions += 1;
                continue;
            }
        }

        if let Some(image_output_dir) = &job.image_output_dir {
            copy_image(&image_path, image_output_dir, &mut stats);
        }
    }
    pb.finish_with_message("Conversion complete");

    Ok(stats)
}

fn copy_image(image_path: &Path, image_output_dir: &Path, stats: &mut ConversionStats) {
    let Some(file_name) = image_path.file_name() else {
        return;
    };
    let destination = image_output_dir.join(file_name);
    match copy_with_metadata(image_path, &destination) {
        Ok(_) => stats.images_copied += 1,
        Err(e) => {
            error!(
                "Failed to copy image {} to {}: {}",
                image_path.display(),
                destination.display(),
                e
            );
            stats.copy_failures += 1;
        }
    }
}

/// Run every job in order and return one stats entry per job
pub fn run_jobs(jobs: &[BatchJob], mapping: &ClassMapping, image_ext: &str) -> Vec<ConversionStats> {
    jobs.iter()
        .map(|job| {
            info!(
                "Processing: {} -> {}",
                job.label_dir.display(),
                job.output_dir.display()
            );
            let stats = match process_job(job, mapping, image_ext) {
                Ok(stats) => stats,
                Err(e) => {
                    error!(
                        "Failed to set up output directories for {}: {}",
                        job.label_dir.display(),
                        e
                    );
                    ConversionStats::default()
                }
            };
            stats.print_summary(job);
            stats
        })
        .collect()
}
