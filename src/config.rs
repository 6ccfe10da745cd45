use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::{BatchJob, ClassMapping};

/// Command-line arguments for converting YOLO labels to KITTI format.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Convert YOLO labels to KITTI format.", long_about = None)]
pub struct ConvertArgs {
    /// List of YOLO label folders to process
    #[arg(short = 'l', long = "label-folders", num_args = 1.., required = true)]
    pub label_folders: Vec<PathBuf>,

    /// List of KITTI label folders to save outputs
    #[arg(short = 'o', long = "output-folders", num_args = 1.., required = true)]
    pub output_folders: Vec<PathBuf>,

    /// List of image folders corresponding to YOLO labels
    #[arg(short = 'i', long = "image-folders", num_args = 1.., required = true)]
    pub image_folders: Vec<PathBuf>,

    /// Optional folders receiving a copy of every successfully converted image
    #[arg(long = "image-output-folders", num_args = 1..)]
    pub image_output_folders: Vec<PathBuf>,

    /// Class mapping in JSON format (e.g. '{"0": "license_plate"}')
    #[arg(short = 'm', long = "class-mapping")]
    pub class_mapping: String,

    /// Extension of the images next to each label file
    #[arg(long = "image-ext", default_value = "jpg", value_parser = validate_extension)]
    pub image_ext: String,

    /// Verify the output folders once every conversion has finished
    #[arg(long = "verify")]
    pub verify: bool,
}

/// Validated conversion settings, built once before any processing starts
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub jobs: Vec<BatchJob>,
    pub class_mapping: ClassMapping,
    pub image_ext: String,
    pub verify: bool,
}

impl ConvertArgs {
    /// Check folder cardinalities and parse the class mapping
    pub fn to_config(&self) -> Result<ConvertConfig, ConfigError> {
        let class_mapping = parse_class_mapping(&self.class_mapping)?;
        let jobs = build_jobs(
            &self.label_folders,
            &self.output_folders,
            &self.image_folders,
            &self.image_output_folders,
        )?;

        Ok(ConvertConfig {
            jobs,
            class_mapping,
            image_ext: self.image_ext.clone(),
            verify: self.verify,
        })
    }
}

/// Command-line arguments for verifying a finished conversion.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Verify converted KITTI labels or copied images.", long_about = None)]
pub struct VerifyArgs {
    /// Folders holding the conversion inputs
    #[arg(short = 's', long = "source-folders", num_args = 1.., required = true)]
    pub source_folders: Vec<PathBuf>,

    /// Folders holding the conversion outputs, in the same order
    #[arg(short = 'd', long = "destination-folders", num_args = 1.., required = true)]
    pub destination_folders: Vec<PathBuf>,

    /// What the folders contain
    #[arg(short = 'k', long = "kind", value_enum, default_value = "labels")]
    pub kind: ContentKind,
}

// Kind of files compared by the verifier
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum ContentKind {
    Labels,
    Images,
}

/// Command-line arguments for drawing YOLO labels on images.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Add bounding boxes to images based on YOLO label files.", long_about = None)]
pub struct VisualizeYoloArgs {
    /// Path to the folder containing raw images
    #[arg(long = "image-folder")]
    pub image_folder: PathBuf,

    /// Path to the folder containing YOLO label files
    #[arg(long = "label-folder")]
    pub label_folder: PathBuf,

    /// Path to the folder where output images will be saved; shown in the image viewer when omitted
    #[arg(long = "output-folder")]
    pub output_folder: Option<PathBuf>,

    /// List of class names, indexed by class id
    #[arg(long = "class-names", num_args = 1.., required = true)]
    pub class_names: Vec<String>,

    /// Extension of the raw images
    #[arg(long = "image-ext", default_value = "jpg", value_parser = validate_extension)]
    pub image_ext: String,

    /// TrueType font used for the class tags
    #[arg(long = "font", default_value = DEFAULT_FONT_PATH)]
    pub font: PathBuf,

    /// Seed for the per-class colors
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,
}

/// Command-line arguments for drawing KITTI labels on images.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Visualize KITTI labels on images.", long_about = None)]
pub struct VisualizeKittiArgs {
    /// Path to the folder containing images
    #[arg(short = 'i', long = "image-folder")]
    pub image_folder: PathBuf,

    /// Path to the folder containing KITTI label files
    #[arg(short = 'l', long = "kitti-folder")]
    pub kitti_folder: PathBuf,

    /// Path to save visualized images; shown in the image viewer when omitted
    #[arg(short = 'o', long = "output-folder")]
    pub output_folder: Option<PathBuf>,

    /// Extension of the raw images
    #[arg(long = "image-ext", default_value = "jpg", value_parser = validate_extension)]
    pub image_ext: String,

    /// TrueType font used for the class tags
    #[arg(long = "font", default_value = DEFAULT_FONT_PATH)]
    pub font: PathBuf,
}

pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Parse the JSON class mapping given on the command line
pub fn parse_class_mapping(json: &str) -> Result<ClassMapping, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Zip the parallel folder lists into batch jobs, rejecting mismatched lengths
pub fn build_jobs(
    label_folders: &[PathBuf],
    output_folders: &[PathBuf],
    image_folders: &[PathBuf],
    image_output_folders: &[PathBuf],
) -> Result<Vec<BatchJob>, ConfigError> {
    let n = label_folders.len();
    if output_folders.len() != n || image_folders.len() != n {
        return Err(ConfigError::FolderCountMismatch {
            what: "label, output, and image",
            counts: vec![n, output_folders.len(), image_folders.len()],
        });
    }
    if !image_output_folders.is_empty() && image_output_folders.len() != n {
        return Err(ConfigError::FolderCountMismatch {
            what: "label and image output",
            counts: vec![n, image_output_folders.len()],
        });
    }

    Ok((0..n)
        .map(|idx| BatchJob {
            label_dir: label_folders[idx].clone(),
            output_dir: output_folders[idx].clone(),
            image_dir: image_folders[idx].clone(),
            image_output_dir: image_output_folders.get(idx).cloned(),
        })
        .collect())
}

// Validate an image extension: non-empty, no dot, no path separator
pub fn validate_extension(s: &str) -> Result<String, String> {
    let ext = s.trim_start_matches('.');
    if ext.is_empty() || ext.contains(['.', '/', '\\']) {
        Err("EXT must be a bare file extension such as 'jpg' or 'png'".to_string())
    } else {
        Ok(ext.to_string())
    }
}
