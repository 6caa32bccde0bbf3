//! Frame storage: the `P6` codec and where frames are read from / written to.

/// Directory-backed store using `tmpNNN.ppm` names.
pub mod dir;
/// In-memory store for tests and debugging.
pub mod memory;
/// `P6` encode/decode.
pub mod ppm;

use crate::foundation::core::FrameNumber;
use crate::foundation::error::ReelResult;
use crate::frame::Frame;

/// Source and destination of a numbered frame sequence.
///
/// Ordering contract: the driver calls `load` in strictly increasing frame-number order starting
/// at [`FrameNumber::FIRST`], and `store` with the same numbers once a frame is transformed.
pub trait FrameStore {
    /// Upper bound on the number of frames available. Not authoritative: `load` may report a
    /// missing frame before the count is reached.
    fn count_frames(&mut self) -> ReelResult<usize>;
    /// Load frame `n`, or `Ok(None)` when it does not exist.
    fn load(&mut self, n: FrameNumber) -> ReelResult<Option<Frame>>;
    /// Persist the transformed frame `n`.
    fn store(&mut self, n: FrameNumber, frame: &Frame) -> ReelResult<()>;
}
