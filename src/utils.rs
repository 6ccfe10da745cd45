use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Create an output directory if needed and return its path.
///
/// Existing directories are kept as they are so that a rerun only
/// overwrites the files it produces again.
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if !path.exists() {
        log::debug!("Creating output directory {}", path.display());
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

/// Pixel dimensions of an image, read from its header without decoding the pixels
pub fn read_image_dimensions(path: &Path) -> image::ImageResult<(u32, u32)> {
    image::image_dimensions(path)
}

/// Lower-cased extension of a path, if any
pub fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
