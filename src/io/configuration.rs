//! Mosaic constants and runtime configuration defaults

use crate::io::error::{GazeError, Result, invalid_split_factor};
use crate::spatial::normalize::InterpolationPolicy;
use std::path::PathBuf;

/// Default number of grid divisions per axis
pub const DEFAULT_SPLITS: u32 = 10;

/// Default number of recursive split levels
pub const DEFAULT_DEPTH: u32 = 1;

/// Maximum number of split levels accepted
pub const MAX_DEPTH: u32 = 4;

/// Default destination prefix for saved images
pub const DEFAULT_OUTPUT_PREFIX: &str = "output/mosaic";

// Output settings
/// Suffix appended to the prefix for the untouched target
pub const ORIGINAL_SUFFIX: &str = "_orig";
/// Suffix appended to the prefix for the assembled mosaic
pub const GAZED_SUFFIX: &str = "_gazed";
/// Extension of every saved image
pub const OUTPUT_EXTENSION: &str = "png";

/// Decimal places kept when bucketing aspect ratios
pub const ASPECT_DECIMALS: i32 = 1;

/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Explicit configuration for a single mosaic run
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicConfig {
    /// Grid divisions per axis at each level
    pub split_factor: u32,
    /// Number of split levels below the root
    pub depth: u32,
    /// Resampling filter used for thumbnails and matches
    pub interpolation: InterpolationPolicy,
    /// Directory holding candidate tile images
    pub pool_directory: PathBuf,
    /// Absolute aspect ratio tolerance; `None` compares ratios rounded to one decimal
    pub aspect_tolerance: Option<f64>,
    /// Worker threads for leaf matching (0 lets rayon decide)
    pub threads: usize,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            split_factor: DEFAULT_SPLITS,
            depth: DEFAULT_DEPTH,
            interpolation: InterpolationPolicy::default(),
            pool_directory: PathBuf::from("pool"),
            aspect_tolerance: None,
            threads: 0,
        }
    }
}

impl MosaicConfig {
    /// Check that the configuration can drive a run
    ///
    /// # Errors
    ///
    /// Returns `InvalidSplitFactor` if the split factor is zero or the depth is
    /// outside `1..=MAX_DEPTH`, or `InvalidTolerance` if an aspect tolerance is
    /// negative, infinite or NaN
    pub fn validate(&self) -> Result<()> {
        if self.split_factor == 0 {
            return Err(invalid_split_factor(
                self.split_factor,
                &"split factor must be at least 1",
            ));
        }
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(invalid_split_factor(
                self.split_factor,
                &format!("depth {} must be between 1 and {MAX_DEPTH}", self.depth),
            ));
        }
        if let Some(value) = self.aspect_tolerance
            && (!value.is_finite() || value < 0.0)
        {
            return Err(GazeError::InvalidTolerance { value });
        }
        Ok(())
    }
}
