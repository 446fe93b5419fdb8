/// Errors produced when wrapping a raw pixel buffer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid frame buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

/// Borrowed view of one video frame.
///
/// Samples are row-major and interleaved, `channels` bytes per pixel. Only the
/// first three channels (R, G, B) are read; alpha is ignored.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    width: usize,
    height: usize,
    channels: usize,
    data: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// Wrap an RGBA8 buffer (`len = width * height * 4`).
    pub fn rgba(width: usize, height: usize, data: &'a [u8]) -> Result<Self, FrameError> {
        Self::with_channels(width, height, 4, data)
    }

    /// Wrap an RGB8 buffer (`len = width * height * 3`).
    pub fn rgb(width: usize, height: usize, data: &'a [u8]) -> Result<Self, FrameError> {
        Self::with_channels(width, height, 3, data)
    }

    fn with_channels(
        width: usize,
        height: usize,
        channels: usize,
        data: &'a [u8],
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions { width, height });
        }
        let Some(expected) = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
        else {
            return Err(FrameError::InvalidDimensions { width, height });
        };
        if data.len() != expected {
            return Err(FrameError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels in the frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// RGB triplet of the pixel at linear index `idx` (row-major).
    #[inline]
    pub fn rgb_at(&self, idx: usize) -> [u8; 3] {
        let o = idx * self.channels;
        [self.data[o], self.data[o + 1], self.data[o + 2]]
    }

    /// Grayscale value of the pixel at linear index `idx`.
    #[inline]
    pub fn gray_at(&self, idx: usize) -> f32 {
        let [r, g, b] = self.rgb_at(idx);
        luma(r, g, b)
    }
}

/// ITU-R BT.601 luma, `0.299 R + 0.587 G + 0.114 B`, on the 0..255 scale.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// HSV saturation in [0, 1]. Black is treated as fully unsaturated.
#[inline]
pub fn saturation(r: u8, g: u8, b: u8) -> f32 {
    let max = r.max(g).max(b);
    if max == 0 {
        return 0.0;
    }
    let min = r.min(g).min(b);
    (max - min) as f32 / max as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_short_buffer() {
        let data = vec![0u8; 10];
        let err = FrameView::rgba(2, 2, &data).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidBuffer {
                expected: 16,
                got: 10
            }
        );
    }

    #[test]
    fn rejects_zero_dimensions() {
        let err = FrameView::rgb(0, 4, &[]).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn rgba_and_rgb_read_the_same_pixel() {
        let rgba = [10u8, 20, 30, 255, 200, 100, 50, 0];
        let rgb = [10u8, 20, 30, 200, 100, 50];
        let a = FrameView::rgba(2, 1, &rgba).unwrap();
        let b = FrameView::rgb(2, 1, &rgb).unwrap();
        assert_eq!(a.rgb_at(1), b.rgb_at(1));
        assert_relative_eq!(a.gray_at(0), b.gray_at(0));
    }

    #[test]
    fn luma_weights_sum_to_one() {
        assert_relative_eq!(luma(255, 255, 255), 255.0, epsilon = 1e-3);
        assert_relative_eq!(luma(100, 0, 0), 29.9, epsilon = 1e-4);
    }

    #[test]
    fn saturation_of_grey_is_zero() {
        assert_eq!(saturation(240, 240, 240), 0.0);
        assert_eq!(saturation(0, 0, 0), 0.0);
        assert_relative_eq!(saturation(200, 100, 100), 0.5);
    }
}
