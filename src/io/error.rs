//! Error types for mosaic construction, matching and persistence

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum GazeError {
    /// Target image does not exist on disk
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Image exists but could not be decoded
    Decode {
        /// Path to the image file
        path: PathBuf,
        /// Underlying codec error
        source: image::ImageError,
    },

    /// A width, height or divisor cannot produce a usable buffer
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Explanation of why the dimensions are unusable
        reason: String,
    },

    /// Split factor is zero, too large for the buffer, or the node is already split
    InvalidSplitFactor {
        /// Provided split factor
        value: u32,
        /// Explanation of why the split factor was rejected
        reason: String,
    },

    /// Aspect tolerance is negative or not a finite number
    InvalidTolerance {
        /// Provided tolerance
        value: f64,
    },

    /// Pool directory could not be listed
    DirectoryUnreadable {
        /// Directory that was scanned
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// No candidate survived loading, or matching was attempted with zero candidates
    EmptyPool {
        /// Pool directory, when the pool came from disk
        directory: Option<PathBuf>,
    },

    /// Node id does not belong to the tree it was used with
    UnknownNode {
        /// The offending arena index
        index: usize,
        /// Number of nodes in the tree
        node_count: usize,
    },

    /// Failed to encode and write an output image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying codec error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for GazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Image '{}' does not exist", path.display())
            }
            Self::Decode { path, source } => {
                write!(f, "Failed to decode image '{}': {source}", path.display())
            }
            Self::InvalidDimensions {
                width,
                height,
                reason,
            } => {
                write!(f, "Invalid dimensions {width}x{height}: {reason}")
            }
            Self::InvalidSplitFactor { value, reason } => {
                write!(f, "Invalid split factor {value}: {reason}")
            }
            Self::InvalidTolerance { value } => {
                write!(
                    f,
                    "Invalid aspect tolerance {value}: must be finite and not negative"
                )
            }
            Self::DirectoryUnreadable { path, source } => {
                write!(
                    f,
                    "Cannot read pool directory '{}': {source}",
                    path.display()
                )
            }
            Self::EmptyPool { directory } => match directory {
                Some(dir) => write!(
                    f,
                    "Pool is empty: no image in '{}' matched the target",
                    dir.display()
                ),
                None => write!(f, "Pool is empty: nothing to match against"),
            },
            Self::UnknownNode { index, node_count } => {
                write!(
                    f,
                    "Node {index} is out of bounds (tree has {node_count} nodes)"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GazeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::DirectoryUnreadable { source, .. } | Self::FileSystem { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, GazeError>;

impl From<image::ImageError> for GazeError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for GazeError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid dimensions error
pub fn invalid_dimensions(width: u32, height: u32, reason: &impl ToString) -> GazeError {
    GazeError::InvalidDimensions {
        width,
        height,
        reason: reason.to_string(),
    }
}

/// Create an invalid split factor error
pub fn invalid_split_factor(value: u32, reason: &impl ToString) -> GazeError {
    GazeError::InvalidSplitFactor {
        value,
        reason: reason.to_string(),
    }
}

impl GazeError {
    /// Whether this error means the pool had nothing to offer
    pub const fn is_empty_pool(&self) -> bool {
        matches!(self, Self::EmptyPool { .. })
    }
}
