//! Trimming and resampling that make differently sized images comparable
//!
//! Both operations are pure: they borrow the input and return a fresh buffer.

use crate::io::configuration::ASPECT_DECIMALS;
use crate::io::error::{Result, invalid_dimensions};
use crate::spatial::PixelBuffer;
use image::imageops::{self, FilterType};

/// Interpolation used whenever a buffer is scaled to new dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum InterpolationPolicy {
    /// Nearest neighbour, fast and adequate for thumbnails
    #[default]
    Nearest,
    /// Bilinear
    Triangle,
    /// Cubic (Catmull-Rom)
    CatmullRom,
    /// Gaussian
    Gaussian,
    /// Lanczos with window 3
    Lanczos3,
}

impl InterpolationPolicy {
    /// Matching `image` crate filter
    pub const fn filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Drop trailing rows and columns so both dimensions divide evenly by `n`
///
/// The top-left origin is preserved. A dimension smaller than `n` trims to zero.
///
/// # Errors
///
/// Returns `InvalidDimensions` if `n` is zero
pub fn trim(buffer: &PixelBuffer, n: u32) -> Result<PixelBuffer> {
    let (width, height) = buffer.dimensions();
    if n == 0 {
        return Err(invalid_dimensions(width, height, &"cannot trim to a multiple of 0"));
    }

    let trimmed_width = width - width % n;
    let trimmed_height = height - height % n;
    if (trimmed_width, trimmed_height) == (width, height) {
        return Ok(buffer.clone());
    }

    Ok(imageops::crop_imm(buffer, 0, 0, trimmed_width, trimmed_height).to_image())
}

/// Scale a buffer to exactly `width` x `height`
///
/// # Errors
///
/// Returns `InvalidDimensions` if either target dimension is zero or the
/// source buffer has no pixels
pub fn resample(
    buffer: &PixelBuffer,
    width: u32,
    height: u32,
    policy: InterpolationPolicy,
) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(invalid_dimensions(
            width,
            height,
            &"resample target must be non-empty",
        ));
    }
    let (source_width, source_height) = buffer.dimensions();
    if source_width == 0 || source_height == 0 {
        return Err(invalid_dimensions(
            source_width,
            source_height,
            &"cannot resample an empty buffer",
        ));
    }
    if (source_width, source_height) == (width, height) {
        return Ok(buffer.clone());
    }

    Ok(imageops::resize(buffer, width, height, policy.filter()))
}

/// Width over height, rounded to one decimal place
pub fn rounded_aspect_ratio(width: u32, height: u32) -> f64 {
    aspect_bucket(width, height) as f64 / 10f64.powi(ASPECT_DECIMALS)
}

/// Integer bucket of the rounded aspect ratio, safe for exact comparison
///
/// Degenerate buffers (zero height) land in bucket 0.
pub fn aspect_bucket(width: u32, height: u32) -> i64 {
    if height == 0 {
        return 0;
    }
    let ratio = f64::from(width) / f64::from(height);
    (ratio * 10f64.powi(ASPECT_DECIMALS)).round() as i64
}

/// Unrounded width over height (zero for degenerate buffers)
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    if height == 0 {
        return 0.0;
    }
    f64::from(width) / f64::from(height)
}
