use crate::foundation::core::Rgb8;
use crate::foundation::error::{ReelError, ReelResult};

/// Owned RGB8 raster, row-major, 3 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap decoded pixel bytes, checking `data.len() == width * height * 3`.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> ReelResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(ReelError::validation(format!(
                "frame data is {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A `width x height` frame where every pixel is `px`.
    pub fn filled(width: u32, height: u32, px: Rgb8) -> ReelResult<Self> {
        let len = byte_len(width, height)?;
        let data = px.to_array().repeat(len / 3);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_pixels(width: u32, height: u32, pixels: &[Rgb8]) -> ReelResult<Self> {
        let data = pixels.iter().flat_map(|px| px.to_array()).collect();
        Self::from_rgb8(width, height, data)
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        let i = self.offset(x, y);
        Rgb8::from_slice(&self.data[i..i + 3])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgb8) {
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&px.to_array());
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgb8> + '_ {
        self.data.chunks_exact(3).map(Rgb8::from_slice)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} frame",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 3
    }
}

fn byte_len(width: u32, height: u32) -> ReelResult<usize> {
    if width == 0 || height == 0 {
        return Err(ReelError::validation("frame width/height must be non-zero"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| ReelError::validation("frame buffer size overflow"))
}
