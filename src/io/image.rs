//! Target decoding and PNG export of the original and gazed images

use crate::io::configuration::{GAZED_SUFFIX, ORIGINAL_SUFFIX, OUTPUT_EXTENSION};
use crate::io::error::{GazeError, Result};
use crate::spatial::{MosaicTree, PixelBuffer};
use image::ImageFormat;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Decode an image file into an RGBA buffer
///
/// # Errors
///
/// Returns `NotFound` if nothing exists at `path`, or `Decode` if the file
/// cannot be read as an image
pub fn decode_buffer<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(GazeError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let image = image::open(path).map_err(|e| GazeError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(image.to_rgba8())
}

/// Load the target image as the root of a new mosaic tree
///
/// # Errors
///
/// Returns `NotFound` or `Decode` as for [`decode_buffer`]
pub fn load_target<P: AsRef<Path>>(path: P) -> Result<MosaicTree> {
    let buffer = decode_buffer(&path)?;
    info!(
        image = %path.as_ref().display(),
        width = buffer.width(),
        height = buffer.height(),
        "loaded target image"
    );
    Ok(MosaicTree::new(buffer))
}

/// Paths of the original and gazed images for a destination prefix
///
/// `output/cat` becomes `output/cat_orig.png` and `output/cat_gazed.png`.
pub fn output_paths(prefix: &Path) -> (PathBuf, PathBuf) {
    let with_suffix = |suffix: &str| {
        let mut name = OsString::from(prefix.as_os_str());
        name.push(format!("{suffix}.{OUTPUT_EXTENSION}"));
        PathBuf::from(name)
    };
    (with_suffix(ORIGINAL_SUFFIX), with_suffix(GAZED_SUFFIX))
}

/// Write the root's original buffer and, if resolved, its gazed buffer
///
/// Missing parent directories are created. Returns the paths written, the
/// original first. If the gazed image cannot be written the original is
/// removed again, so a failed save leaves no output behind.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - Either image cannot be encoded or written
pub fn save(tree: &MosaicTree, prefix: &Path) -> Result<Vec<PathBuf>> {
    let root = tree.node(tree.root())?;
    let (original_path, gazed_path) = output_paths(prefix);

    if let Some(parent) = original_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GazeError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let mut written = Vec::with_capacity(2);
    write_png(root.buffer(), &original_path)?;
    written.push(original_path.clone());

    if let Some(gazed) = root.matched() {
        if let Err(error) = write_png(gazed, &gazed_path) {
            discard(&original_path);
            return Err(error);
        }
        written.push(gazed_path);
    }

    info!(files = written.len(), prefix = %prefix.display(), "saved images");
    Ok(written)
}

fn write_png(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    buffer
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| GazeError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
}

fn discard(path: &Path) {
    if let Err(error) = std::fs::remove_file(path) {
        warn!(file = %path.display(), %error, "could not remove partial output");
    }
}
