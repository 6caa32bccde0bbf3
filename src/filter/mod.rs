//! Per-frame transforms: kernel convolution and desaturation.

pub mod convolve;
pub mod desaturate;
pub mod kernel;

use crate::frame::Frame;
use kernel::Kernel;

/// The transform applied to every frame of a run. Exactly one is chosen per run.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOp {
    Convolve(Kernel),
    Desaturate,
}

impl FrameOp {
    /// Transform `frame`.
    ///
    /// Convolution swaps in a freshly allocated buffer; desaturation edits pixels in place.
    pub fn apply(&self, frame: &mut Frame) {
        match self {
            FrameOp::Convolve(k) => *frame = convolve::convolve(frame, k),
            FrameOp::Desaturate => desaturate::desaturate_in_place(frame),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FrameOp::Convolve(_) => "convolve",
            FrameOp::Desaturate => "desaturate",
        }
    }
}

impl Default for FrameOp {
    fn default() -> Self {
        FrameOp::Convolve(Kernel::edge())
    }
}
