//! Command line driver for SIFT keypoint extraction
//!
//! Reads a point cloud, detects scale-invariant keypoints on its
//! elevation field, writes the keypoint positions back out, and can show
//! both clouds in the interactive viewer.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use cloudsift_algorithms::{detect_sift_keypoints, SiftConfig};
use cloudsift_io::{read_point_cloud, write_point_cloud};

/// Detect SIFT keypoints in a point cloud using elevation as intensity
#[derive(Parser, Debug)]
#[command(name = "cloudsift", version, about)]
struct Args {
    /// Input point cloud file (.ply, .xyz, .txt)
    input: PathBuf,

    /// Output file for the detected keypoint positions
    output: PathBuf,

    /// Standard deviation of the smallest scale in the scale space
    #[arg(long, default_value_t = 0.2)]
    min_scale: f32,

    /// Number of octaves (doublings of scale) to compute
    #[arg(long, default_value_t = 10)]
    octaves: usize,

    /// Number of scales to compute within each octave
    #[arg(long, default_value_t = 8)]
    scales_per_octave: usize,

    /// Minimum accepted difference-of-Gaussians magnitude
    #[arg(long, default_value_t = 0.0)]
    min_contrast: f32,

    /// Show the cloud and its keypoints in an interactive viewer
    #[arg(long)]
    visualize: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let config = SiftConfig::new(
        args.min_scale,
        args.octaves,
        args.scales_per_octave,
        args.min_contrast,
    );

    let cloud = read_point_cloud(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    info!("loaded {} points from {}", cloud.len(), args.input.display());

    let start = Instant::now();
    let keypoints = detect_sift_keypoints(&cloud, &config).context("keypoint detection failed")?;
    let elapsed = start.elapsed();

    println!("min_contrast = {}", config.min_contrast);
    println!(
        "# of SIFT points in the result are {} ({:.1?})",
        keypoints.len(),
        elapsed
    );

    write_point_cloud(&keypoints.positions(), &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("wrote keypoints to {}", args.output.display());

    if args.visualize {
        cloudsift_visualization::show_keypoints(&cloud, &keypoints)
            .context("viewer failed")?;
    }

    Ok(())
}
