// ABOUTME: Utility functions for the openxml-pptx crate
// ABOUTME: Path validation, recursive directory walking and copying

use crate::errors::{PptxError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PptxError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(PptxError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Validate that a directory exists
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PptxError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(PptxError::ValidationError(format!(
            "Path is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(PptxError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory_exists(parent)?;
        }
    }
    Ok(())
}

fn glob_paths(dir: &Path, pattern: &str) -> Result<glob::Paths> {
    let glob_pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    glob::glob(&glob_pattern)
        .map_err(|e| PptxError::ValidationError(format!("Invalid glob pattern: {}", e)))
}

/// Run a glob pattern below `dir` and return the sorted matches.
/// Entries that cannot be read are skipped.
pub fn glob_in(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = glob_paths(dir, pattern)?.flatten().collect();
    paths.sort();
    Ok(paths)
}

/// Every regular file below `root`, sorted, including dot-files such as `.rels`.
/// Fails if any directory in the tree cannot be read.
pub fn list_files_recursive(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob_paths(root, "**/*")? {
        let path = entry.map_err(|e| PptxError::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Path of `path` relative to `root`, joined with forward slashes as used
/// for ZIP entry names
pub fn archive_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        PptxError::ValidationError(format!("{:?} is not inside {:?}", path, root))
    })?;

    let segments: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(segments.join("/"))
}

/// Recursively copy the files of one directory tree into another
pub fn copy_dir_recursive(source: &Path, destination: &Path) -> Result<usize> {
    validate_directory_exists(source)?;
    ensure_directory_exists(destination)?;

    let files = list_files_recursive(source)?;
    for file in &files {
        let relative = file.strip_prefix(source).map_err(|_| {
            PptxError::ValidationError(format!("{:?} is not inside {:?}", file, source))
        })?;
        let target = destination.join(relative);
        ensure_parent_directory_exists(&target)?;
        debug!("Copying {:?} to {:?}", file, target);
        fs::copy(file, &target)?;
    }
    Ok(files.len())
}

/// Find image files that match a pattern in a directory
pub fn find_images(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    validate_directory_exists(dir)?;
    Ok(glob_in(dir, pattern)?
        .into_iter()
        .filter(|path| path.is_file())
        .collect())
}
