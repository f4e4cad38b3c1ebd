/// Command-line parsing and run orchestration
pub mod cli;
/// Constants and explicit run configuration
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Target loading and image export
pub mod image;
/// Logging subscriber setup
pub mod logging;
/// Candidate pool loading and filtering
pub mod pool;
/// Progress display while matching
pub mod progress;
