//! This crate provides routines for building an animated GIF from an
//! ordered sequence of still images (PNG or JPEG).
//!
//! Consecutive frames that are visually indistinguishable are
//! collapsed into a single stored frame that is displayed for longer,
//! so a screen recording with long static stretches produces a small
//! file.  Frames are decoded and compared in order; only the palette
//! quantization step runs in parallel.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! let paths = vec![
//!     PathBuf::from("frames/0001.png"),
//!     PathBuf::from("frames/0002.png") ];
//!
//! gifrun::build_gif(&paths, Path::new("out.gif"), 30);
//! ```

pub use crate::dedup::Similarity;
pub use crate::errcode::Category;
pub use crate::errcode::GifError;
pub use crate::errcode::GifResult;
pub use crate::frame::{DedupRun, PalettedRun, RawFrame};
pub use crate::icon::IconSimilarity;

pub mod assemble;
pub mod decode;
pub mod dedup;
pub mod encode;
pub mod errcode;
pub mod frame;
pub mod icon;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::info;

/// Summary of a successful build.
#[derive(Clone, Debug)]
pub struct BuildReport {
    /// Number of source frames decoded.
    pub frames: usize,

    /// Number of frames stored after deduplication.
    pub runs: usize,

    /// Wall-clock processing time.
    pub elapsed: Duration,
}

/// Build an animated GIF from an ordered list of image files.
///
/// `paths` must already be in display order; no re-sorting happens
/// here.  An `fps` of 0 is treated as 30.
///
/// The operation is all-or-nothing: the first unreadable or
/// undecodable source, any quantization failure, or any error writing
/// the destination aborts the build, and no usable output file is
/// guaranteed afterwards.  An empty `paths` list fails with
/// [`GifError::NoFrames`].
pub fn build_gif(paths: &[PathBuf], out: &Path, fps: u32)
        -> GifResult<BuildReport> {
    let start = Instant::now();

    let frames = paths.iter().map(|p| decode::decode_frame(p));
    let runs = dedup::collapse(frames, &IconSimilarity)?;
    if runs.is_empty() {
        return Err(GifError::NoFrames);
    }

    let paletted = encode::palettize(runs)?;
    let stored = paletted.len();
    assemble::save_gif(paletted, fps, out)?;

    let elapsed = start.elapsed();
    info!("{}: stored {} of {} frame(s) in {:?}",
            out.display(), stored, paths.len(), elapsed);

    Ok(BuildReport {
        frames: paths.len(),
        runs: stored,
        elapsed,
    })
}
