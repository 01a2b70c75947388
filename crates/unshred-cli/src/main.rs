// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unshred: reassemble a page cut into vertical strips.
//
// Entry point. Initialises logging, builds the configuration from the command
// line (and an optional JSON file), runs the reconstruction, and writes the
// page to disk.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use unshred_core::ReassemblyConfig;
use unshred_core::error::Result;
use unshred_core::human_errors::humanize_error;
use unshred_strips::ImageProcessor;
use unshred_strips::Reconstructor;
use unshred_strips::scan::draw_rectangles;

/// Reassemble a page cut into vertical strips from a single photograph.
#[derive(Debug, Parser)]
#[command(name = "unshred", version, about)]
struct Args {
    /// Photograph of the strips on a contrasting background.
    input: PathBuf,

    /// Where to write the reconstructed page.
    #[arg(short, long, default_value = "reconstructed.png")]
    output: PathBuf,

    /// JSON configuration file; command line options override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge columns used for each strip fingerprint.
    #[arg(long)]
    side_width: Option<u32>,

    /// Edge-based crop tightening passes per strip.
    #[arg(long)]
    approx_iterations: Option<u32>,

    /// Resize the photograph to this width before detection.
    #[arg(long, conflicts_with = "no_resize")]
    resize_width: Option<u32>,

    /// Detect on the photograph at its original size.
    #[arg(long)]
    no_resize: bool,

    /// Also write the photograph with the detected outlines drawn on it.
    #[arg(long)]
    debug_rects: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Reconstruction failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;
    let reconstructor = Reconstructor::new(config);
    let result = reconstructor.reconstruct_path(&args.input)?;

    if let Some(path) = &args.debug_rects {
        let overlay = draw_rectangles(&result.detection_image, &result.rectangles);
        ImageProcessor::from_rgb(overlay).save(path)?;
        tracing::info!(path = %path.display(), "Detection overlay written");
    }

    ImageProcessor::from_rgb(result.image).save(&args.output)?;
    tracing::info!(
        path = %args.output.display(),
        strips = result.strip_count,
        "Reconstructed page written"
    );
    Ok(())
}

/// Start from the config file (or defaults) and apply command line overrides.
fn build_config(args: &Args) -> Result<ReassemblyConfig> {
    let mut config = match &args.config {
        Some(path) => ReassemblyConfig::from_json_file(path)?,
        None => ReassemblyConfig::default(),
    };

    if let Some(side_width) = args.side_width {
        config.side_width = side_width;
    }
    if let Some(iterations) = args.approx_iterations {
        config.approx_iterations = iterations;
    }
    if args.no_resize {
        config.resize_width = None;
    } else if let Some(width) = args.resize_width {
        config.resize_width = Some(width);
    }

    config.validate()?;
    Ok(config)
}
