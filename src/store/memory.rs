use crate::foundation::core::FrameNumber;
use crate::foundation::error::ReelResult;
use crate::frame::Frame;
use crate::store::FrameStore;
use std::collections::BTreeMap;

/// In-memory [`FrameStore`].
///
/// The reported frame count defaults to the number of input frames and can be overridden to
/// model stray files in an input directory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inputs: BTreeMap<FrameNumber, Frame>,
    count_override: Option<usize>,
    outputs: BTreeMap<FrameNumber, Frame>,
    loads: Vec<FrameNumber>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `frames` as frames 1..=len.
    pub fn from_frames(frames: impl IntoIterator<Item = Frame>) -> Self {
        let mut s = Self::new();
        for (i, f) in frames.into_iter().enumerate() {
            s.inputs.insert(FrameNumber(i as u32 + 1), f);
        }
        s
    }

    pub fn remove(&mut self, n: FrameNumber) -> Option<Frame> {
        self.inputs.remove(&n)
    }

    pub fn set_reported_count(&mut self, count: usize) {
        self.count_override = Some(count);
    }

    /// Stored output frames in frame-number order.
    pub fn outputs(&self) -> &BTreeMap<FrameNumber, Frame> {
        &self.outputs
    }

    /// Every frame number passed to `load`, in call order.
    pub fn loads(&self) -> &[FrameNumber] {
        &self.loads
    }
}

impl FrameStore for InMemoryStore {
    fn count_frames(&mut self) -> ReelResult<usize> {
        Ok(self.count_override.unwrap_or(self.inputs.len()))
    }

    fn load(&mut self, n: FrameNumber) -> ReelResult<Option<Frame>> {
        self.loads.push(n);
        Ok(self.inputs.get(&n).cloned())
    }

    fn store(&mut self, n: FrameNumber, frame: &Frame) -> ReelResult<()> {
        self.outputs.insert(n, frame.clone());
        Ok(())
    }
}
