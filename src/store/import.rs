use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::note::UploadItem;

/// Split a comma-separated list of local paths as typed into the upload
/// dialog. Blank entries are dropped.
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Stat each path and build an upload batch in the given order.
///
/// The batch is all-or-nothing: a missing path or a non-regular file fails
/// the whole call.
pub fn read_upload_items(paths: &[PathBuf]) -> Result<Vec<UploadItem>> {
    paths.iter().map(|p| upload_item(p)).collect()
}

fn upload_item(path: &Path) -> Result<UploadItem> {
    let metadata = fs::metadata(path)
        .map_err(|e| AppError::InvalidPath(format!("{}: {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AppError::InvalidPath(format!("{} has no file name", path.display())))?;
    Ok(UploadItem::new(name, metadata.len()))
}
