//! Brute-force similarity search over the candidate pool
//!
//! The distance between two equally sized buffers is the mean, over all
//! pixels, of the summed absolute red, green and blue differences. Alpha is
//! ignored. Lower scores are closer matches.

use crate::io::error::{GazeError, Result, invalid_dimensions};
use crate::io::pool::PoolCandidate;
use crate::spatial::normalize::{InterpolationPolicy, resample};
use crate::spatial::{MosaicTree, NodeId, PixelBuffer};

/// Winning candidate of a search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    /// Position of the winner in the candidate sequence
    pub index: usize,
    /// Mean per-pixel RGB difference of the winner
    pub score: f64,
}

/// Mean per-pixel sum of absolute RGB channel differences
///
/// # Errors
///
/// Returns `InvalidDimensions` if the buffers differ in size or are empty
pub fn score(a: &PixelBuffer, b: &PixelBuffer) -> Result<f64> {
    let (width, height) = a.dimensions();
    if b.dimensions() != (width, height) {
        let (other_width, other_height) = b.dimensions();
        return Err(invalid_dimensions(
            other_width,
            other_height,
            &format!("cannot compare against a {width}x{height} buffer"),
        ));
    }

    let pixel_count = u64::from(width) * u64::from(height);
    if pixel_count == 0 {
        return Err(invalid_dimensions(width, height, &"cannot score empty buffers"));
    }

    let total: u64 = a
        .pixels()
        .zip(b.pixels())
        .map(|(p, q)| {
            let [r1, g1, b1, _] = p.0;
            let [r2, g2, b2, _] = q.0;
            u64::from(r1.abs_diff(r2)) + u64::from(g1.abs_diff(g2)) + u64::from(b1.abs_diff(b2))
        })
        .sum();

    Ok(total as f64 / pixel_count as f64)
}

/// Find the candidate closest to `target`
///
/// Candidates must already have `target`'s dimensions. On equal scores the
/// earliest candidate wins.
///
/// # Errors
///
/// Returns `EmptyPool` if there are no candidates, or `InvalidDimensions` if
/// a candidate differs in size from the target
pub fn best_match<'a, I>(target: &PixelBuffer, candidates: I) -> Result<MatchOutcome>
where
    I: IntoIterator<Item = &'a PixelBuffer>,
{
    let mut best: Option<MatchOutcome> = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        let candidate_score = score(target, candidate)?;
        if best.is_none_or(|current| candidate_score < current.score) {
            best = Some(MatchOutcome {
                index,
                score: candidate_score,
            });
        }
    }
    best.ok_or(GazeError::EmptyPool { directory: None })
}

/// Match one leaf against the pool and store the winner as its output
///
/// Every candidate is resampled fresh to the leaf's dimensions before
/// scoring. The stored match is the resampled copy. A leaf that is already
/// resolved keeps its existing match.
///
/// # Errors
///
/// Returns `EmptyPool` for an empty pool, `UnknownNode` for a foreign id, or
/// `InvalidDimensions` if the leaf has no pixels
pub fn match_leaf(
    tree: &mut MosaicTree,
    leaf: NodeId,
    pool: &[PoolCandidate],
    policy: InterpolationPolicy,
) -> Result<usize> {
    if pool.is_empty() {
        return Err(GazeError::EmptyPool { directory: None });
    }

    let node = tree.node(leaf)?;
    let (width, height) = node.dimensions();
    let resampled = pool
        .iter()
        .map(|candidate| resample(&candidate.buffer, width, height, policy))
        .collect::<Result<Vec<_>>>()?;

    let outcome = best_match(node.buffer(), &resampled)?;
    if let Some(winner) = resampled.into_iter().nth(outcome.index) {
        tree.set_matched(leaf, winner)?;
    }
    Ok(outcome.index)
}
