//! Binary morphology with the 4-neighbourhood cross.
//!
//! Out-of-frame neighbours are treated as background.

#[inline]
fn cross_any(src: &[u8], w: usize, h: usize, x: usize, y: usize) -> bool {
    let i = y * w + x;
    src[i] != 0
        || (x > 0 && src[i - 1] != 0)
        || (x + 1 < w && src[i + 1] != 0)
        || (y > 0 && src[i - w] != 0)
        || (y + 1 < h && src[i + w] != 0)
}

#[inline]
fn cross_all(src: &[u8], w: usize, h: usize, x: usize, y: usize) -> bool {
    let i = y * w + x;
    src[i] != 0
        && x > 0
        && src[i - 1] != 0
        && x + 1 < w
        && src[i + 1] != 0
        && y > 0
        && src[i - w] != 0
        && y + 1 < h
        && src[i + w] != 0
}

/// One dilation pass, `src -> dst`.
pub fn dilate4(src: &[u8], dst: &mut [u8], w: usize, h: usize) {
    for y in 0..h {
        for x in 0..w {
            dst[y * w + x] = cross_any(src, w, h, x, y) as u8;
        }
    }
}

/// One erosion pass, `src -> dst`.
pub fn erode4(src: &[u8], dst: &mut [u8], w: usize, h: usize) {
    for y in 0..h {
        for x in 0..w {
            dst[y * w + x] = cross_all(src, w, h, x, y) as u8;
        }
    }
}

/// Closing (dilate then erode) in place; `scratch` must match `mask` in size.
///
/// Fills pinholes and notches inside a blob while keeping convex outlines.
pub fn close4(mask: &mut [u8], scratch: &mut [u8], w: usize, h: usize) {
    dilate4(mask, scratch, w, h);
    erode4(scratch, mask, w, h);
}
