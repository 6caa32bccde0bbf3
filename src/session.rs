use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::RunConfig;
use crate::encode::ffmpeg::assemble_video;
use crate::foundation::error::ReelResult;
use crate::pipeline::driver::{Driver, RunReport};
use crate::store::dir::DirFrameStore;

/// Result of [`run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub report: RunReport,
    /// Wall time for the whole frame pipeline, I/O included (video assembly excluded).
    pub total_time: Duration,
    /// Path of the assembled video, when one was written.
    pub video: Option<PathBuf>,
}

/// Filter the configured input directory into the output directory, then assemble the video.
///
/// Video assembly is skipped when disabled or when no frame was stored.
pub fn run(cfg: &RunConfig) -> ReelResult<RunSummary> {
    cfg.validate()?;
    let mut store = DirFrameStore::new(&cfg.input_dir, &cfg.output_dir);
    let mut driver = Driver::new(cfg.frame_op(), cfg.driver_opts())?;

    let begin = Instant::now();
    let report = driver.run(&mut store)?;
    let total_time = begin.elapsed();

    let video = match &cfg.video {
        Some(opts) if report.frames_stored > 0 => {
            assemble_video(store.output_dir(), opts)?;
            Some(opts.out_path.clone())
        }
        Some(_) => {
            info!("no frames stored; skipping video assembly");
            None
        }
        None => None,
    };

    Ok(RunSummary {
        report,
        total_time,
        video,
    })
}
