/// Widen an 8-bit buffer with `C` channels per pixel to RGBA.
///
/// 1 channel is gray, 2 gray + alpha, 3 RGB and 4 is copied as is.
pub(crate) fn widen_to_rgba8<const C: usize>(buf: &[u8]) -> Vec<u8> {
    if C == 4 {
        return buf.to_vec();
    }

    let mut rgba = Vec::with_capacity(buf.len() / C * 4);
    for px in buf.chunks_exact(C) {
        let pixel = match C {
            1 => [px[0], px[0], px[0], u8::MAX],
            2 => [px[0], px[0], px[0], px[1]],
            _ => [px[0], px[1], px[2], u8::MAX],
        };
        rgba.extend_from_slice(&pixel);
    }
    rgba
}
