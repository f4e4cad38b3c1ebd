use crate::io::error::Result;
use crate::io::pool::PoolCandidate;
use crate::spatial::PixelBuffer;
use crate::spatial::normalize::{InterpolationPolicy, resample};
use rayon::prelude::*;
use std::collections::HashMap;

/// Key for caching a resampled copy of the pool
///
/// Leaves of a single-depth mosaic all share one size, so one entry usually
/// serves the whole tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TileKey {
    width: u32,
    height: u32,
}

impl TileKey {
    /// Create a key for the given leaf dimensions
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Memoization cache of the pool scaled to each leaf size in use
///
/// Entries are built once before matching starts and only read afterwards,
/// so concurrent matchers can share the cache by reference.
#[derive(Default)]
pub struct ResampleCache {
    /// Leaf size to resampled pool mapping, in pool order
    entries: HashMap<TileKey, Vec<PixelBuffer>>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl ResampleCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the pool scaled to `key`, resampling it on first request
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if the key has a zero dimension
    pub fn get_or_resample(
        &mut self,
        key: TileKey,
        pool: &[PoolCandidate],
        policy: InterpolationPolicy,
    ) -> Result<&[PixelBuffer]> {
        use std::collections::hash_map::Entry;

        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                Ok(entry.into_mut().as_slice())
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                let resampled = pool
                    .par_iter()
                    .map(|candidate| resample(&candidate.buffer, key.width, key.height, policy))
                    .collect::<Result<Vec<_>>>()?;
                Ok(entry.insert(resampled).as_slice())
            }
        }
    }

    /// Read an entry that has already been built
    pub fn get(&self, key: TileKey) -> Option<&[PixelBuffer]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Number of distinct leaf sizes cached
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
