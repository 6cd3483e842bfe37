//! Single-shot prediction CLI.
//!
//! `predict <image_path>` prints exactly one JSON object on stdout; all
//! diagnostics go to stderr. Recoverable failures are reported in-band and
//! exit 0; anything else exits non-zero without producing JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use plantvillage_predict::backend::{self, Compute, DefaultBackend};
use plantvillage_predict::inference::runner::{self, RunOptions};
use plantvillage_predict::model::default_artifact_path;

/// Plant disease classification from a single leaf image
#[derive(Parser, Debug)]
#[command(
    name = "predict",
    about = "Classify a plant leaf image against the 16 PlantVillage disease classes",
    version
)]
struct Args {
    /// Path to the image to classify
    #[arg(value_name = "IMAGE_PATH")]
    image: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging()?;

    let compute = Compute::detect();
    let device = backend::device_for(compute);
    info!("Backend: {} ({})", backend::backend_name(), compute);

    let weights = default_artifact_path().context("Failed to resolve checkpoint path")?;
    let options = RunOptions {
        image: args.image,
        weights,
    };

    let report =
        runner::run::<DefaultBackend>(&options, &device).context("Inference pipeline failed")?;
    println!("{}", report.to_json()?);

    Ok(())
}

fn setup_logging() -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // stdout carries nothing but the JSON object, so the subscriber writes
    // to stderr. RUST_LOG overrides the default level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
