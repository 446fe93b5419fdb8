use dartcam_core::{luma, saturation, FrameView};

use crate::DetectorParams;

/// Per-frame scratch buffers, sized to the current resolution and reused.
#[derive(Debug, Default)]
pub(crate) struct Workspace {
    pub width: usize,
    pub height: usize,
    pub gray: Vec<f32>,
    pub diff: Vec<f32>,
    pub highlight: Vec<bool>,
    pub mask: Vec<u8>,
    pub scratch: Vec<u8>,
    pub labels: Vec<u32>,
    pub queue: Vec<usize>,
    pub blob_pixels: Vec<usize>,
}

impl Workspace {
    fn ensure_size(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }
        let n = width * height;
        self.width = width;
        self.height = height;
        self.gray.resize(n, 0.0);
        self.diff.resize(n, 0.0);
        self.highlight.resize(n, false);
        self.mask.resize(n, 0);
        self.scratch.resize(n, 0);
        self.labels.resize(n, 0);
        self.queue.clear();
        self.queue.reserve(n);
        self.blob_pixels.clear();
    }

    /// Fill `gray` and `highlight` from the frame.
    pub fn load(&mut self, frame: &FrameView<'_>, params: &DetectorParams) {
        self.ensure_size(frame.width(), frame.height());
        for i in 0..frame.len() {
            let [r, g, b] = frame.rgb_at(i);
            let y = luma(r, g, b);
            self.gray[i] = y;
            self.highlight[i] =
                y >= params.highlight_luma && saturation(r, g, b) <= params.highlight_max_saturation;
        }
    }
}
