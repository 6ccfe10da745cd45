use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

// Image extensions accepted by the verifier when checking copied images
pub const VERIFY_IMG_FORMATS: &[&str] = &["png", "jpg"];

// Extension used by label files on both sides of the conversion
pub const LABEL_EXTENSION: &str = "txt";

// Number of whitespace separated fields in a canonical KITTI label line
pub const KITTI_FIELD_COUNT: usize = 15;

// Number of fields in a YOLO detection label line
pub const YOLO_FIELD_COUNT: usize = 5;

// Class name used for ids missing from the class mapping
pub const DONT_CARE: &str = "DontCare";

/// A YOLO box: class id plus normalized center and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloBox {
    pub class_id: usize,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// A KITTI 2D box: class name plus absolute pixel corners
#[derive(Debug, Clone, PartialEq)]
pub struct KittiBox {
    pub class_name: String,
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// Mapping from string-encoded class ids to class names, e.g. `{"0": "license_plate"}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassMapping(pub BTreeMap<String, String>);

impl ClassMapping {
    /// Resolve a class id to its name, falling back to `DontCare`
    pub fn resolve(&self, class_id: usize) -> &str {
        self.0
            .get(&class_id.to_string())
            .map(String::as_str)
            .unwrap_or(DONT_CARE)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// One folder triple of a batch conversion, plus the optional image copy destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub label_dir: PathBuf,
    pub output_dir: PathBuf,
    pub image_dir: PathBuf,
    pub image_output_dir: Option<PathBuf>,
}

// Struct to hold conversion statistics for one batch job
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    pub labels_found: usize,
    pub labels_converted: usize,
    pub skipped_missing_image: usize,
    pub failed_conversions: usize,
    pub images_copied: usize,
    pub copy_failures: usize,
}

impl ConversionStats {
    pub fn print_summary(&self, job: &BatchJob) {
        log::info!(
            "=== Conversion Summary: {} -> {} ===",
            job.label_dir.display(),
            job.output_dir.display()
        );
        log::info!("Label files found: {}", self.labels_found);
        log::info!("Labels processed: {}", self.labels_converted);
        if job.image_output_dir.is_some() {
            log::info!("Images copied: {}", self.images_copied);
            log::info!("Image copy failures: {}", self.copy_failures);
        }

        let total_skipped = self.skipped_missing_image + self.failed_conversions;
        if total_skipped > 0 {
            log::warn!(
                "Total skipped label files: {} (missing image: {}, failed conversion: {})",
                total_skipped,
                self.skipped_missing_image,
                self.failed_conversions
            );
        }
    }
}

// Struct to hold rendering statistics for a visualizer run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VisualizeStats {
    pub images_rendered: usize,
    pub boxes_drawn: usize,
    pub skipped_missing_image: usize,
    pub failed: usize,
}

impl VisualizeStats {
    pub fn print_summary(&self) {
        log::info!("Box number: {}, Image number: {}", self.boxes_drawn, self.images_rendered);
        if self.skipped_missing_image > 0 || self.failed > 0 {
            log::warn!(
                "Skipped label files: {} missing image, {} failed",
                self.skipped_missing_image,
                self.failed
            );
        }
    }
}

/// Outcome of comparing one source folder with its destination folder
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub source_count: usize,
    pub destination_count: usize,
    pub missing_files: BTreeSet<String>,
    pub unexpected_files: BTreeSet<String>,
    pub errors: Vec<(String, String)>,
}

impl VerificationReport {
    /// A pair passes only when counts match and nothing is missing, unexpected or broken
    pub fn passed(&self) -> bool {
        self.source_count == self.destination_count
            && self.missing_files.is_empty()
            && self.unexpected_files.is_empty()
            && self.errors.is_empty()
    }
}
