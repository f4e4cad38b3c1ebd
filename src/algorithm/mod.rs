/// Per-size resampled copies of the pool
pub mod cache;
/// Bottom-up assembly and the full gaze traversal
pub mod compositor;
/// Similarity scoring and best-match search
pub mod matcher;
