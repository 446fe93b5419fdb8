//! Frame loading with the `image` crate.

use std::fs;
use std::path::{Path, PathBuf};

use ::image::RgbaImage;
use dartcam_core::{FrameError, FrameView};
use log::debug;

use crate::session::{FrameSession, SessionConfig, SessionError, SessionReport};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Decode an image file as RGBA8.
pub fn load_rgba(path: impl AsRef<Path>) -> Result<RgbaImage, SessionError> {
    Ok(::image::open(path)?.to_rgba8())
}

/// Borrow an RGBA image as a detector frame.
pub fn frame_view(img: &RgbaImage) -> Result<FrameView<'_>, FrameError> {
    FrameView::rgba(img.width() as usize, img.height() as usize, img.as_raw())
}

/// Image files in `dir`, sorted by file name so numbered frames play in order.
pub fn list_frames(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, SessionError> {
    let dir = dir.as_ref();
    let mut frames = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_frame = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if path.is_file() && is_frame {
            frames.push(path);
        }
    }
    if frames.is_empty() {
        return Err(SessionError::NoFrames(dir.display().to_string()));
    }
    frames.sort();
    Ok(frames)
}

/// Score a sequence of frame files as one session.
pub fn run_frames(
    config: &SessionConfig,
    paths: &[PathBuf],
) -> Result<SessionReport, SessionError> {
    let mut session = FrameSession::new(config)?;
    for path in paths {
        let img = load_rgba(path)?;
        let frame = frame_view(&img)?;
        let report = session.push_frame(path.display().to_string(), &frame);
        debug!("{}: {}", path.display(), report.event);
    }
    Ok(session.finish())
}
