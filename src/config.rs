use crate::encode::ffmpeg::VideoOpts;
use crate::filter::FrameOp;
use crate::filter::kernel::Kernel;
use crate::foundation::error::{ReelError, ReelResult};
use crate::pipeline::driver::{DEFAULT_STRIDE_LEN, DriverOpts};
use std::path::{Path, PathBuf};

/// Built-in per-frame operations.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OpChoice {
    /// 5x5 edge-detection kernel.
    #[default]
    Edge,
    /// 5x5 emboss kernel.
    Emboss,
    /// 1x1 pass-through kernel.
    Identity,
    /// Channel-average desaturation.
    Desaturate,
}

/// Everything a run needs. Loadable from JSON; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Frames per chunk.
    pub stride_len: usize,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub op: OpChoice,
    /// Custom kernel replacing the `op` preset. Not allowed with `desaturate`.
    pub kernel: Option<Kernel>,
    /// Video assembly after processing; `null` skips it.
    pub video: Option<VideoOpts>,
    /// Log per-frame transform timings.
    pub trace_frames: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            stride_len: DEFAULT_STRIDE_LEN,
            input_dir: PathBuf::from("infiles"),
            output_dir: PathBuf::from("outfiles"),
            op: OpChoice::default(),
            kernel: None,
            video: Some(VideoOpts::default()),
            trace_frames: false,
        }
    }
}

impl RunConfig {
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ReelError::validation(format!("invalid run config: {e}")))?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        use anyhow::Context as _;
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.stride_len == 0 {
            return Err(ReelError::validation("stride length must be > 0"));
        }
        if self.input_dir == self.output_dir {
            return Err(ReelError::validation(
                "input and output directories must differ",
            ));
        }
        if let Some(k) = &self.kernel {
            if self.op == OpChoice::Desaturate {
                return Err(ReelError::validation(
                    "a custom kernel cannot be combined with desaturate",
                ));
            }
            k.validate()?;
        }
        if let Some(v) = &self.video {
            v.validate()?;
        }
        Ok(())
    }

    pub fn frame_op(&self) -> FrameOp {
        if let Some(k) = &self.kernel {
            return FrameOp::Convolve(k.clone());
        }
        match self.op {
            OpChoice::Edge => FrameOp::Convolve(Kernel::edge()),
            OpChoice::Emboss => FrameOp::Convolve(Kernel::emboss()),
            OpChoice::Identity => FrameOp::Convolve(Kernel::identity()),
            OpChoice::Desaturate => FrameOp::Desaturate,
        }
    }

    pub fn driver_opts(&self) -> DriverOpts {
        DriverOpts {
            stride_len: self.stride_len,
            trace_frames: self.trace_frames,
        }
    }
}
