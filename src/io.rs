use glob::{glob_with, MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::fs::{self, File, FileTimes};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::utils::extension_lowercase;

/// Collect the regular files directly inside `dir` whose extension is one of
/// `extensions` (case-insensitive), sorted by path.
pub fn collect_files_with_extensions(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut files: Vec<PathBuf> = match glob_with(&pattern, options) {
        Ok(paths) => paths
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("Failed to read directory entry: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .filter(|path| {
                extension_lowercase(path)
                    .is_some_and(|ext| extensions.iter().any(|wanted| ext == *wanted))
            })
            .collect(),
        Err(e) => {
            log::error!("Invalid glob pattern {}: {}", pattern, e);
            Vec::new()
        }
    };
    files.sort();
    files
}

/// File names (not paths) of the matching files inside `dir`
pub fn file_names_with_extensions(dir: &Path, extensions: &[&str]) -> BTreeSet<String> {
    collect_files_with_extensions(dir, extensions)
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

/// Path of the file in `dir` sharing the stem of `path`, with extension `ext`
pub fn companion_path(path: &Path, dir: &Path, ext: &str) -> Option<PathBuf> {
    // Stems may contain dots, so append instead of using `with_extension`
    let mut name = path.file_stem()?.to_os_string();
    name.push(".");
    name.push(ext);
    Some(dir.join(name))
}

/// Copy a file, keeping its permissions and access/modification times
pub fn copy_with_metadata(from: &Path, to: &Path) -> std::io::Result<u64> {
    let bytes = fs::copy(from, to)?;
    let metadata = fs::metadata(from)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    // Setting times only needs ownership, so this also works on a read-only copy
    File::open(to)?.set_times(times)?;
    Ok(bytes)
}

/// Write text to `path` in one go through a buffered writer
pub fn write_text_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()
}
