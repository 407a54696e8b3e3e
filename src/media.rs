// ABOUTME: Media handling for pictures embedded in slides
// ABOUTME: Checks image types, reads pixel sizes and copies files into the package tree

use crate::errors::{PptxError, Result};
use crate::utils;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Raster extensions that can be embedded
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Media directory relative to the package root
pub const MEDIA_DIR: &str = "ppt/media";

/// Reject files whose extension is not a supported raster type
pub fn check_image_type(path: &Path) -> Result<()> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(PptxError::UnsupportedImageType(path.to_path_buf()))
    }
}

/// File name of a picture as it will appear under `ppt/media`
pub fn media_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            PptxError::ValidationError(format!("Image path has no UTF-8 file name: {:?}", path))
        })
}

/// Intrinsic pixel size of an image file
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|source| PptxError::ImageDecodeFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy a picture into the media directory of a package tree.
/// The source file is left untouched.
pub fn copy_into_package(source: &Path, package_root: &Path, name: &str) -> Result<PathBuf> {
    let media_dir = package_root.join(MEDIA_DIR);
    utils::ensure_directory_exists(&media_dir)?;

    let destination = media_dir.join(name);
    info!("Copying {:?} to {:?}", source, destination);
    fs::copy(source, &destination)?;
    Ok(destination)
}
