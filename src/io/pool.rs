//! Candidate pool loading with aspect ratio filtering
//!
//! Every regular file in the pool directory is decoded, trimmed with the
//! target's split factor, checked against the target's aspect ratio and scaled
//! down to the leaf tile size. Files are visited in sorted path order so the
//! same directory and target always yield the same pool.

use crate::io::error::{GazeError, Result, invalid_split_factor};
use crate::spatial::normalize::{
    InterpolationPolicy, aspect_bucket, aspect_ratio, resample, rounded_aspect_ratio, trim,
};
use crate::spatial::{MosaicTree, NodeId, PixelBuffer};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A pool image normalized to the leaf tile size
#[derive(Debug, Clone)]
pub struct PoolCandidate {
    /// Pixels at the exact leaf tile dimensions
    pub buffer: PixelBuffer,
    /// Origin file name, kept for diagnostics
    pub source_id: String,
}

/// How candidate aspect ratios are compared with the target's
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AspectFilter {
    /// Ratios rounded to one decimal place must be equal
    #[default]
    Rounded,
    /// Unrounded ratios may differ by at most this much
    Tolerance(f64),
}

impl AspectFilter {
    /// Pick the filter matching an optional explicit tolerance
    pub const fn from_tolerance(tolerance: Option<f64>) -> Self {
        match tolerance {
            Some(t) => Self::Tolerance(t),
            None => Self::Rounded,
        }
    }

    /// Whether a candidate of `candidate` dimensions fits a target of `target` dimensions
    pub fn accepts(self, candidate: (u32, u32), target: (u32, u32)) -> bool {
        match self {
            Self::Rounded => {
                aspect_bucket(candidate.0, candidate.1) == aspect_bucket(target.0, target.1)
            }
            Self::Tolerance(tolerance) => {
                let difference = aspect_ratio(candidate.0, candidate.1)
                    - aspect_ratio(target.0, target.1);
                difference.abs() <= tolerance
            }
        }
    }
}

/// Load every usable image in `directory` as a candidate for `target`'s leaves
///
/// `target` must already be split; its post-trim dimensions define the aspect
/// ratio and its cell size defines the candidate dimensions. Files that fail
/// to decode or do not fit the aspect ratio are skipped.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be listed (`DirectoryUnreadable`)
/// - The target node has not been split (`InvalidSplitFactor`)
/// - No file survives filtering (`EmptyPool`)
pub fn load_pool(
    directory: &Path,
    tree: &MosaicTree,
    target: NodeId,
    filter: AspectFilter,
    policy: InterpolationPolicy,
) -> Result<Vec<PoolCandidate>> {
    let node = tree.node(target)?;
    let n = node
        .split_factor()
        .ok_or_else(|| invalid_split_factor(0, &"target node has not been split"))?;
    let target_dimensions = node.dimensions();
    let (tile_width, tile_height) = tree.tile_dimensions(target)?;

    let files = collect_files(directory)?;
    debug!(
        directory = %directory.display(),
        files = files.len(),
        target_aspect = rounded_aspect_ratio(target_dimensions.0, target_dimensions.1),
        "scanning pool"
    );

    let loaded: Vec<Result<Option<PoolCandidate>>> = files
        .par_iter()
        .map(|path| {
            let Some(buffer) = decode_candidate(path) else {
                return Ok(None);
            };
            let trimmed = trim(&buffer, n)?;
            let dimensions = trimmed.dimensions();
            if dimensions.0 == 0 || dimensions.1 == 0 || !filter.accepts(dimensions, target_dimensions)
            {
                debug!(
                    file = %path.display(),
                    aspect = rounded_aspect_ratio(dimensions.0, dimensions.1),
                    "aspect ratio mismatch, skipping"
                );
                return Ok(None);
            }
            let buffer = resample(&trimmed, tile_width, tile_height, policy)?;
            Ok(Some(PoolCandidate {
                buffer,
                source_id: source_id(path),
            }))
        })
        .collect();

    let mut pool = Vec::new();
    for candidate in loaded {
        if let Some(candidate) = candidate? {
            pool.push(candidate);
        }
    }

    if pool.is_empty() {
        return Err(GazeError::EmptyPool {
            directory: Some(directory.to_path_buf()),
        });
    }

    info!(
        accepted = pool.len(),
        scanned = files.len(),
        tile_width,
        tile_height,
        "loaded image pool"
    );
    Ok(pool)
}

/// Regular files of `directory`, sorted by path
fn collect_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let unreadable = |source| GazeError::DirectoryUnreadable {
        path: directory.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn decode_candidate(path: &Path) -> Option<PixelBuffer> {
    match image::open(path) {
        Ok(image) => Some(image.to_rgba8()),
        Err(error) => {
            warn!(file = %path.display(), %error, "skipping undecodable pool file");
            None
        }
    }
}

fn source_id(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
