//! Spatial data structures for the mosaic
//!
//! This module contains:
//! - Trimming and resampling of pixel buffers
//! - The mosaic node tree and the grid splitter

/// Trimming, resampling and aspect ratio helpers
pub mod normalize;
/// Mosaic node arena and grid splitting
pub mod tree;

pub use tree::{MosaicNode, MosaicTree, NodeId};

/// In-memory RGBA pixel grid every component operates on
pub type PixelBuffer = image::RgbaImage;
