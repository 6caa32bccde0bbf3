//! ppmreel filters a numbered sequence of binary PPM frames.
//!
//! Frames are read from disk in fixed-size chunks so at most `stride_len` frames are held in
//! memory, each frame is convolved with a square kernel (or desaturated), and the results are
//! written to a parallel directory that `ffmpeg` can assemble into a video.
//!
//! - Build a [`RunConfig`] (or a [`Driver`] over any [`FrameStore`])
//! - Call [`run`] / [`Driver::run`]
//! - Inspect the returned [`RunReport`]
#![forbid(unsafe_code)]

mod foundation;

/// Run configuration.
pub mod config;
/// Video assembly.
pub mod encode;
/// Per-frame transforms.
pub mod filter;
/// In-memory frame raster.
pub mod frame;
/// Chunked processing pipeline.
pub mod pipeline;
/// One-call run over directories.
pub mod session;
/// Frame codec and storage.
pub mod store;

pub use crate::foundation::core::{FrameNumber, Rgb8};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::config::{OpChoice, RunConfig};
pub use crate::encode::ffmpeg::{VideoOpts, assemble_video};
pub use crate::filter::FrameOp;
pub use crate::filter::kernel::Kernel;
pub use crate::frame::Frame;
pub use crate::pipeline::driver::{
    DEFAULT_STRIDE_LEN, Driver, DriverOpts, DriverState, RunReport, process_frames,
};
pub use crate::session::{RunSummary, run};
pub use crate::store::FrameStore;
pub use crate::store::dir::DirFrameStore;
pub use crate::store::memory::InMemoryStore;
