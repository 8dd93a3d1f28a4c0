//! Pipeline data model.
//!
//! Frames move through the pipeline in one direction only.  Each type
//! below is produced by one stage, owned by it until handed to the
//! next stage, and dropped as soon as it has been superseded.

use std::path::PathBuf;

use image::RgbaImage;

/// A decoded still image, together with the path it was read from.
///
/// Immutable once decoded.  The path is kept so that later stages can
/// name the offending file in their errors.
pub struct RawFrame {
    pub path: PathBuf,
    pub image: RgbaImage,
}

impl RawFrame {
    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// A maximal run of consecutive, visually identical input frames: one
/// representative frame plus the number of originals it stands for.
///
/// The representative is always the *first* frame of the run; the
/// duplicates that followed it have already been dropped.
pub struct DedupRun {
    pub frame: RawFrame,

    // Number of consecutive source frames merged into this run.
    // Always >= 1.
    pub repeat: u32,
}

/// A quantized frame with its own local colour table (up to 256
/// entries), plus the repetition count carried over unchanged from the
/// originating [`DedupRun`].
pub struct PalettedRun {
    pub frame: gif::Frame<'static>,
    pub repeat: u32,
}
