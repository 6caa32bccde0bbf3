use crate::filter::kernel::Kernel;
use crate::frame::Frame;

/// Convolve `src` with `kernel` into a newly allocated frame of the same size.
///
/// Taps that land outside the frame are skipped: they add nothing to the sum and their weight
/// is not redistributed.
pub fn convolve(src: &Frame, kernel: &Kernel) -> Frame {
    let w = src.width as i64;
    let h = src.height as i64;
    let half_x = (kernel.x / 2) as i64;
    let half_y = (kernel.y / 2) as i64;
    let mut out = vec![0u8; src.data.len()];

    for x in 0..w {
        for y in 0..h {
            let mut acc = [0i64; 3];
            for fx in 0..kernel.x {
                let sx = x + fx as i64 - half_x;
                if sx < 0 || sx >= w {
                    continue;
                }
                for fy in 0..kernel.y {
                    let sy = y + fy as i64 - half_y;
                    if sy < 0 || sy >= h {
                        continue;
                    }
                    let kw = kernel.tap_weight(fx, fy);
                    let idx = ((sy * w + sx) as usize) * 3;
                    for c in 0..3 {
                        acc[c] += i64::from(src.data[idx + c]) * kw;
                    }
                }
            }
            let out_idx = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                out[out_idx + c] = kernel.finish_channel(acc[c]);
            }
        }
    }

    Frame {
        width: src.width,
        height: src.height,
        data: out,
    }
}
