use crate::frame::Frame;

/// Replace every pixel with the integer mean of its channels, in place.
pub fn desaturate_in_place(frame: &mut Frame) {
    for px in frame.data.chunks_exact_mut(3) {
        let avg = ((u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2])) / 3) as u8;
        px.fill(avg);
    }
}
