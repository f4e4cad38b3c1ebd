//! Recursive photomosaic composition
//!
//! A target image is split into a grid of regions (optionally several levels
//! deep), every leaf region is matched against a pool of candidate images by
//! mean RGB difference, and the matches are reassembled bottom-up into a
//! mosaic the size of the trimmed target.

#![forbid(unsafe_code)]

/// Leaf matching, resample caching and mosaic assembly
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// Pixel buffers, normalization and the mosaic tree
pub mod spatial;

pub use io::error::{GazeError, Result};
