use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ContentKind;
use crate::error::ConfigError;
use crate::io::file_names_with_extensions;
use crate::types::{VerificationReport, KITTI_FIELD_COUNT, LABEL_EXTENSION, VERIFY_IMG_FORMATS};
use crate::utils::create_progress_bar;

impl ContentKind {
    /// Extensions enumerated for this kind of content
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ContentKind::Labels => &[LABEL_EXTENSION],
            ContentKind::Images => VERIFY_IMG_FORMATS,
        }
    }
}

/// Verify each source folder against the destination folder at the same position
pub fn verify(
    source_dirs: &[PathBuf],
    destination_dirs: &[PathBuf],
    kind: ContentKind,
) -> Result<Vec<VerificationReport>, ConfigError> {
    if source_dirs.len() != destination_dirs.len() {
        return Err(ConfigError::FolderCountMismatch {
            what: "source and destination",
            counts: vec![source_dirs.len(), destination_dirs.len()],
        });
    }

    Ok(source_dirs
        .iter()
        .zip(destination_dirs)
        .map(|(source, destination)| verify_pair(source, destination, kind))
        .collect())
}

/// Compare the file sets of one folder pair and check every destination file.
///
/// Read-only: nothing on disk is modified.
pub fn verify_pair(source: &Path, destination: &Path, kind: ContentKind) -> VerificationReport {
    info!(
        "Verifying {:?}: {} -> {}",
        kind,
        source.display(),
        destination.display()
    );

    let source_files = file_names_with_extensions(source, kind.extensions());
    let destination_files = file_names_with_extensions(destination, kind.extensions());

    let mut report = VerificationReport {
        source_dir: source.to_path_buf(),
        destination_dir: destination.to_path_buf(),
        source_count: source_files.len(),
        destination_count: destination_files.len(),
        missing_files: source_files.difference(&destination_files).cloned().collect(),
        unexpected_files: destination_files.difference(&source_files).cloned().collect(),
        errors: Vec::new(),
    };

    if !destination.is_dir() {
        report.errors.push((
            destination.display().to_string(),
            "destination folder not found".to_string(),
        ));
        return report;
    }

    let pb = create_progress_bar(destination_files.len() as u64, "Verify");
    for file_name in &destination_files {
        let path = destination.join(file_name);
        let issues = match kind {
            ContentKind::Images => check_image_file(&path),
            ContentKind::Labels => check_label_file(&path),
        };
        report
            .errors
            .extend(issues.into_iter().map(|issue| (file_name.clone(), issue)));
        pb.inc(1);
    }
    pb.finish_and_clear();

    report
}

/// Decode the whole image; any failure is one issue
pub fn check_image_file(path: &Path) -> Vec<String> {
    match image::open(path) {
        Ok(_) => Vec::new(),
        Err(e) => vec![format!("image decode error: {}", e)],
    }
}

/// Check a KITTI label file: non-empty, and exactly 15 fields on every line
pub fn check_label_file(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => check_label_content(&content),
        Err(e) => vec![format!("read error: {}", e)],
    }
}

/// Structural issues of KITTI label contents, one entry per offending line
pub fn check_label_content(content: &str) -> Vec<String> {
    if content.trim().is_empty() {
        return vec!["empty file".to_string()];
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.split_whitespace().count() != KITTI_FIELD_COUNT)
        .map(|(idx, _)| format!("{}: format error", idx + 1))
        .collect()
}
