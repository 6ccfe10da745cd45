//! YOLO to KITTI label converter
//!
//! This library converts YOLO detection labels to the KITTI label format,
//! verifies converted folders and draws labels onto images for inspection.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod report;
pub mod types;
pub mod utils;
pub mod verify;
pub mod visualize;

// Re-export commonly used types and functions
pub use config::{
    ContentKind, ConvertArgs, ConvertConfig, VerifyArgs, VisualizeKittiArgs, VisualizeYoloArgs,
};
pub use conversion::{convert_label_file, read_kitti_labels, read_yolo_labels};
pub use dataset::{process_job, run_jobs};
pub use error::{ConfigError, LabelError, ParseError};
pub use report::{all_passed, print_reports, render_reports};
pub use types::{
    BatchJob, ClassMapping, ConversionStats, KittiBox, VerificationReport, VisualizeStats,
    YoloBox,
};
pub use verify::{verify, verify_pair};
pub use visualize::{load_font, visualize_kitti, visualize_yolo, Palette};
