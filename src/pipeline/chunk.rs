use crate::foundation::error::{ReelError, ReelResult};
use std::ops::Range;

/// Partition of `num_frames` 0-based positions into windows of at most `stride_len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    num_frames: usize,
    stride_len: usize,
}

impl ChunkPlan {
    pub fn new(num_frames: usize, stride_len: usize) -> ReelResult<Self> {
        if stride_len == 0 {
            return Err(ReelError::validation("stride length must be > 0"));
        }
        Ok(Self {
            num_frames,
            stride_len,
        })
    }

    /// `ceil(num_frames / stride_len)`.
    pub fn num_chunks(self) -> usize {
        self.num_frames.div_ceil(self.stride_len)
    }

    /// Positions covered by chunk `i`; empty past the last chunk.
    pub fn chunk(self, i: usize) -> Range<usize> {
        let start = i.saturating_mul(self.stride_len).min(self.num_frames);
        let end = start.saturating_add(self.stride_len).min(self.num_frames);
        start..end
    }

    pub fn chunks(self) -> impl Iterator<Item = Range<usize>> {
        (0..self.num_chunks()).map(move |i| self.chunk(i))
    }
}
