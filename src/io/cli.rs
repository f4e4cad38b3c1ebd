//! Command-line interface for composing a single photomosaic

use crate::algorithm::compositor::{GazeOptions, gaze};
use crate::io::configuration::{DEFAULT_DEPTH, DEFAULT_OUTPUT_PREFIX, DEFAULT_SPLITS, MosaicConfig};
use crate::io::error::Result;
use crate::io::image::{load_target, save};
use crate::io::pool::{AspectFilter, load_pool};
use crate::spatial::normalize::InterpolationPolicy;
use clap::Parser;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "gaze")]
#[command(
    author,
    version,
    about = "Rebuild an image as a mosaic of images from a pool"
)]
/// Command-line arguments for the mosaic tool
pub struct Cli {
    /// Image to turn into a mosaic
    #[arg(short, long, value_name = "IMAGE")]
    pub image: PathBuf,

    /// Directory of candidate tile images
    #[arg(short, long, value_name = "DIR")]
    pub pool: PathBuf,

    /// Grid divisions per axis at each level
    #[arg(short, long, default_value_t = DEFAULT_SPLITS)]
    pub splits: u32,

    /// Number of recursive split levels
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,

    /// Resampling filter for tiles
    #[arg(short, long, value_enum, default_value_t = InterpolationPolicy::Nearest)]
    pub filter: InterpolationPolicy,

    /// Accept pool images whose aspect ratio is within this distance of the
    /// target's, instead of comparing ratios rounded to one decimal
    #[arg(short = 't', long)]
    pub aspect_tolerance: Option<f64>,

    /// Destination prefix; writes <prefix>_orig.png and <prefix>_gazed.png
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PREFIX)]
    pub output: PathBuf,

    /// Worker threads for matching (0 uses every core)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub threads: usize,

    /// Suppress progress output and informational logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Log debug details such as rejected pool files
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Explicit run configuration derived from the flags
    pub fn config(&self) -> MosaicConfig {
        MosaicConfig {
            split_factor: self.splits,
            depth: self.depth,
            interpolation: self.filter,
            pool_directory: self.pool.clone(),
            aspect_tolerance: self.aspect_tolerance,
            threads: self.threads,
        }
    }
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Files written, original first
    pub written: Vec<PathBuf>,
    /// Number of accepted pool candidates
    pub pool_size: usize,
    /// Number of matched leaves
    pub leaf_count: usize,
}

/// Drives one mosaic from target to saved output
pub struct MosaicRunner {
    cli: Cli,
}

impl MosaicRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load, split, match, assemble and save
    ///
    /// Nothing is written unless every stage succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the target cannot be
    /// loaded or split, the pool is unreadable or empty, or saving fails
    pub fn run(&self) -> Result<RunSummary> {
        let config = self.cli.config();
        config.validate()?;

        match Self::worker_pool(config.threads) {
            Some(workers) => workers.install(|| self.compose(&config)),
            None => self.compose(&config),
        }
    }

    fn compose(&self, config: &MosaicConfig) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut tree = load_target(&self.cli.image)?;
        let root = tree.root();
        let (first_width, first_height) = tree.node(root)?.dimensions();

        tree.split_to_depth(config.split_factor, config.depth)?;
        let (width, height) = tree.node(root)?.dimensions();
        info!(
            image = %self.cli.image.display(),
            "starting dimensions {first_width}x{first_height}, trimmed to {width}x{height}"
        );

        let pool = load_pool(
            &config.pool_directory,
            &tree,
            root,
            AspectFilter::from_tolerance(config.aspect_tolerance),
            config.interpolation,
        )?;

        let options = GazeOptions {
            interpolation: config.interpolation,
            show_progress: self.cli.should_show_progress(),
        };
        gaze(&mut tree, &pool, &options)?;

        let written = save(&tree, &self.cli.output)?;
        let leaf_count = tree.leaves().len();
        info!(
            elapsed_secs = start_time.elapsed().as_secs_f64(),
            leaves = leaf_count,
            "mosaic complete"
        );

        Ok(RunSummary {
            written,
            pool_size: pool.len(),
            leaf_count,
        })
    }

    // Zero threads keeps rayon's global pool
    fn worker_pool(threads: usize) -> Option<ThreadPool> {
        if threads == 0 {
            return None;
        }
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .inspect_err(|error| warn!(%error, threads, "falling back to the default worker pool"))
            .ok()
    }
}
