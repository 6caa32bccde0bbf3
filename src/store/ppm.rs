//! Binary PPM (`P6`) codec restricted to 8-bit channels.
//!
//! Header layout accepted by [`decode_p6`]:
//!
//! ```text
//! P6
//! # any number of comment lines
//! <width> <height>
//! 255
//! <width * height * 3 bytes of RGB>
//! ```
//!
//! [`encode_p6`] always writes the same layout with a single `# Created by ppmreel` comment.

use crate::foundation::error::{ReelError, ReelResult};
use crate::frame::Frame;
use std::io::{self, BufRead, Write};

/// Tool name written in the header comment of every stored frame.
pub const CREATOR: &str = "ppmreel";
/// The only supported max channel value.
pub const MAX_CHANNEL_VALUE: u32 = 255;

const MAGIC: [u8; 2] = *b"P6";

/// Decode one `P6` raster from `r`.
///
/// Any header or payload defect is a [`ReelError::Format`].
pub fn decode_p6<R: BufRead>(r: &mut R) -> ReelResult<Frame> {
    let mut magic = [0u8; 2];
    read_exact_or(r, &mut magic, "missing image format tag")?;
    if magic != MAGIC {
        return Err(ReelError::format("invalid image format (must be 'P6')"));
    }
    match peek(r)? {
        Some(b) if b.is_ascii_whitespace() || b == b'#' => {}
        _ => return Err(ReelError::format("invalid image format (must be 'P6')")),
    }

    let width = read_field(r, "invalid image size")?;
    let height = read_field(r, "invalid image size")?;
    if width == 0 || height == 0 {
        return Err(ReelError::format(format!(
            "invalid image size {width}x{height}"
        )));
    }

    let max_value = read_field(r, "invalid rgb component")?;
    if max_value != MAX_CHANNEL_VALUE {
        return Err(ReelError::format(format!(
            "max channel value {max_value} is not supported (only 8-bit components)"
        )));
    }

    // Everything up to and including the next newline belongs to the header.
    let mut rest = Vec::new();
    r.read_until(b'\n', &mut rest)
        .map_err(|e| ReelError::format(format!("failed to read header: {e}")))?;
    if rest.last() != Some(&b'\n') {
        return Err(ReelError::format("header is not terminated by a newline"));
    }

    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| ReelError::format("image size overflow"))?;
    let mut data = vec![0u8; len];
    read_exact_or(r, &mut data, "truncated pixel data")?;

    Frame::from_rgb8(width, height, data)
}

/// Encode `frame` as `P6` into `w`.
pub fn encode_p6<W: Write>(w: &mut W, frame: &Frame) -> ReelResult<()> {
    write_p6(w, frame).map_err(|e| ReelError::Other(anyhow::Error::new(e)))
}

fn write_p6<W: Write>(w: &mut W, frame: &Frame) -> io::Result<()> {
    w.write_all(&MAGIC)?;
    w.write_all(b"\n")?;
    writeln!(w, "# Created by {CREATOR}")?;
    writeln!(w, "{} {}", frame.width, frame.height)?;
    writeln!(w, "{MAX_CHANNEL_VALUE}")?;
    w.write_all(&frame.data)?;
    w.flush()
}

fn read_exact_or<R: BufRead>(r: &mut R, buf: &mut [u8], what: &str) -> ReelResult<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ReelError::format(what),
        _ => ReelError::format(format!("{what}: {e}")),
    })
}

fn peek<R: BufRead>(r: &mut R) -> ReelResult<Option<u8>> {
    let buf = r
        .fill_buf()
        .map_err(|e| ReelError::format(format!("failed to read header: {e}")))?;
    Ok(buf.first().copied())
}

fn skip_whitespace_and_comments<R: BufRead>(r: &mut R) -> ReelResult<()> {
    let mut sink = Vec::new();
    while let Some(b) = peek(r)? {
        if b.is_ascii_whitespace() {
            r.consume(1);
        } else if b == b'#' {
            sink.clear();
            r.read_until(b'\n', &mut sink)
                .map_err(|e| ReelError::format(format!("failed to read comment: {e}")))?;
        } else {
            break;
        }
    }
    Ok(())
}

fn read_field<R: BufRead>(r: &mut R, what: &str) -> ReelResult<u32> {
    skip_whitespace_and_comments(r)?;
    let mut value: Option<u32> = None;
    while let Some(b) = peek(r)? {
        if !b.is_ascii_digit() {
            break;
        }
        let digit = u32::from(b - b'0');
        let next = value
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| ReelError::format(format!("{what}: value overflows")))?;
        value = Some(next);
        r.consume(1);
    }
    value.ok_or_else(|| ReelError::format(what))
}
