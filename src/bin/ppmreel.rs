use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ppmreel::{Kernel, OpChoice, RunConfig};

/// Filter a numbered PPM frame sequence (`tmp001.ppm`, `tmp002.ppm`, ...) and assemble an MP4.
#[derive(Parser, Debug)]
#[command(name = "ppmreel", version)]
struct Cli {
    /// Frames held in memory per chunk (default 20).
    stride_len: Option<usize>,

    /// JSON run configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the input frames.
    #[arg(long = "in-dir")]
    in_dir: Option<PathBuf>,

    /// Directory the filtered frames are written to.
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Operation applied to every frame.
    #[arg(long, value_enum)]
    op: Option<OpChoice>,

    /// JSON kernel file replacing the preset kernel.
    #[arg(long)]
    kernel: Option<PathBuf>,

    /// Output video path.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Skip video assembly.
    #[arg(long, conflicts_with = "video")]
    no_video: bool,

    /// Log the transform time of every frame.
    #[arg(long)]
    trace_frames: bool,

    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = build_config(&cli)?;
    let summary = ppmreel::run(&cfg)?;

    let report = &summary.report;
    if let Some(n) = report.stopped_at {
        info!(frame = %n, stored = report.frames_stored, "input ended before the predicted count");
    }
    println!(
        "{:.6} seconds spent\n{:.6} seconds spent processing",
        summary.total_time.as_secs_f64(),
        report.transform_time.as_secs_f64()
    );
    if let Some(video) = &summary.video {
        eprintln!("wrote {}", video.display());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "ppmreel=debug"
    } else {
        "ppmreel=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let mut cfg = match &cli.config {
        Some(path) => RunConfig::from_path(path)?,
        None => RunConfig::default(),
    };

    match cli.stride_len {
        Some(n) => cfg.stride_len = n,
        None if cli.config.is_none() => {
            info!(stride_len = cfg.stride_len, "using default stride length");
        }
        None => {}
    }
    if let Some(dir) = &cli.in_dir {
        cfg.input_dir = dir.clone();
    }
    if let Some(dir) = &cli.out_dir {
        cfg.output_dir = dir.clone();
    }
    if let Some(op) = cli.op {
        cfg.op = op;
        cfg.kernel = None;
    }
    if let Some(path) = &cli.kernel {
        let k = Kernel::from_path(path)
            .with_context(|| format!("load kernel '{}'", path.display()))?;
        cfg.kernel = Some(k);
    }
    if cli.no_video {
        cfg.video = None;
    } else if let Some(path) = &cli.video {
        let mut v = cfg.video.take().unwrap_or_default();
        v.out_path = path.clone();
        cfg.video = Some(v);
    }
    cfg.trace_frames |= cli.trace_frames;

    cfg.validate().context("invalid run configuration")?;
    Ok(cfg)
}
