use crate::foundation::error::{ReelError, ReelResult};

/// 1-based frame number, as used in on-disk frame names (`tmp001.ppm` is frame 1).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameNumber(pub u32);

impl FrameNumber {
    /// First frame of every sequence.
    pub const FIRST: Self = Self(1);

    /// Build a frame number from a 0-based sequence position.
    pub fn from_position(pos: usize) -> ReelResult<Self> {
        let n = pos
            .checked_add(1)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ReelError::validation("frame position exceeds u32 range"))?;
        Ok(Self(n))
    }

    /// 0-based sequence position of this frame.
    pub fn position(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl std::fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// One 8-bit RGB pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_slice(px: &[u8]) -> Self {
        Self::new(px[0], px[1], px[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_number_formats_zero_padded() {
        assert_eq!(FrameNumber(7).to_string(), "007");
        assert_eq!(FrameNumber(301).to_string(), "301");
        assert_eq!(FrameNumber(1234).to_string(), "1234");
    }

    #[test]
    fn frame_number_position_round_trips() {
        let n = FrameNumber::from_position(0).unwrap();
        assert_eq!(n, FrameNumber::FIRST);
        assert_eq!(FrameNumber(20).position(), 19);
    }
}
