//! Bottom-up reassembly of matched tiles into the final mosaic
//!
//! Gazing first matches every unresolved leaf against the pool in parallel,
//! then walks the tree in post-order so each interior node is assembled only
//! after all of its children are resolved.

use crate::algorithm::cache::{ResampleCache, TileKey};
use crate::algorithm::matcher::best_match;
use crate::io::error::{GazeError, Result, invalid_dimensions, invalid_split_factor};
use crate::io::pool::PoolCandidate;
use crate::io::progress::MatchProgress;
use crate::spatial::normalize::InterpolationPolicy;
use crate::spatial::tree::grid_cell;
use crate::spatial::{MosaicTree, NodeId, PixelBuffer};
use image::imageops;
use rayon::prelude::*;
use tracing::{debug, info};

/// Tunables for a gaze pass
#[derive(Debug, Clone, Copy, Default)]
pub struct GazeOptions {
    /// Filter used to scale candidates to each leaf size
    pub interpolation: InterpolationPolicy,
    /// Draw a progress bar while matching
    pub show_progress: bool,
}

/// Build a node's output from its children
///
/// Each child's match (or its raw pixels if it was never matched) is copied
/// into the same cell the splitter cut it from. A leaf yields a copy of its
/// own match, falling back to its raw pixels. A child that was trimmed by its
/// own split covers the top-left of its cell and the remainder stays
/// transparent.
///
/// # Errors
///
/// Returns `UnknownNode` for a foreign id or `InvalidDimensions` if a child's
/// output is larger than its cell
pub fn assemble(tree: &MosaicTree, id: NodeId) -> Result<PixelBuffer> {
    let node = tree.node(id)?;
    if node.is_leaf() {
        return Ok(node.matched().unwrap_or_else(|| node.buffer()).clone());
    }

    let n = node
        .split_factor()
        .ok_or_else(|| invalid_split_factor(0, &"interior node without a split factor"))?;
    let (width, height) = node.dimensions();
    let mut output = PixelBuffer::new(width, height);

    for &child_id in node.children() {
        let child = tree.node(child_id)?;
        let (grid_x, grid_y) = child.grid_position();
        let cell = grid_cell(width, height, n, grid_x, grid_y);
        let source = child.matched().unwrap_or_else(|| child.buffer());
        if source.width() > cell.width || source.height() > cell.height {
            let (source_width, source_height) = source.dimensions();
            return Err(invalid_dimensions(
                source_width,
                source_height,
                &format!(
                    "cell ({grid_x}, {grid_y}) expects {}x{}",
                    cell.width, cell.height
                ),
            ));
        }
        imageops::replace(&mut output, source, i64::from(cell.x), i64::from(cell.y));
    }

    Ok(output)
}

/// Resolve every node of the tree, ending with the root
///
/// Unresolved leaves are matched against the pool, using one resampled copy
/// of the pool per distinct leaf size. Interior nodes are then assembled in
/// post-order. Nodes that are already resolved keep their output.
///
/// # Errors
///
/// Returns `EmptyPool` if the pool is empty (before the tree is touched), or
/// any error raised while resampling, matching or assembling
pub fn gaze(tree: &mut MosaicTree, pool: &[PoolCandidate], options: &GazeOptions) -> Result<()> {
    if pool.is_empty() {
        return Err(GazeError::EmptyPool { directory: None });
    }

    let mut leaves = Vec::new();
    for leaf in tree.leaves() {
        let node = tree.node(leaf)?;
        if !node.is_resolved() {
            let (width, height) = node.dimensions();
            leaves.push((leaf, TileKey::new(width, height)));
        }
    }

    let mut cache = ResampleCache::new();
    for &(_, key) in &leaves {
        cache.get_or_resample(key, pool, options.interpolation)?;
    }
    debug!(
        leaves = leaves.len(),
        sizes = cache.len(),
        hits = cache.stats.hits,
        misses = cache.stats.misses,
        "pool resampled for leaf sizes"
    );

    let progress = MatchProgress::new(leaves.len(), options.show_progress);
    let matches = match_leaves(tree, &leaves, &cache, &progress);
    progress.finish();

    for (leaf, buffer) in matches? {
        tree.set_matched(leaf, buffer)?;
    }

    let root = tree.root();
    resolve(tree, root)?;
    info!(leaves = leaves.len(), nodes = tree.len(), "mosaic assembled");
    Ok(())
}

fn match_leaves(
    tree: &MosaicTree,
    leaves: &[(NodeId, TileKey)],
    cache: &ResampleCache,
    progress: &MatchProgress,
) -> Result<Vec<(NodeId, PixelBuffer)>> {
    leaves
        .par_iter()
        .map(|&(leaf, key)| {
            let candidates = cache
                .get(key)
                .ok_or(GazeError::EmptyPool { directory: None })?;
            let node = tree.node(leaf)?;
            let outcome = best_match(node.buffer(), candidates)?;
            let winner = candidates
                .get(outcome.index)
                .ok_or(GazeError::EmptyPool { directory: None })?;
            progress.tick();
            Ok((leaf, winner.clone()))
        })
        .collect()
}

fn resolve(tree: &mut MosaicTree, id: NodeId) -> Result<()> {
    let node = tree.node(id)?;
    if node.is_resolved() || node.is_leaf() {
        return Ok(());
    }

    let children = node.children().to_vec();
    for child in children {
        resolve(tree, child)?;
    }

    let assembled = assemble(tree, id)?;
    tree.set_matched(id, assembled)?;
    Ok(())
}
