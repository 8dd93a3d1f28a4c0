//! Parallel palette encoding.
//!
//! Each dedup run is quantized into an indexed raster with its own
//! local colour table of up to 256 entries.  Runs carry no shared
//! state, so quantization is a pure data-parallel map: the worker pool
//! encodes all runs concurrently, and the indexed collect writes every
//! result into its original position.  Output order therefore never
//! depends on completion order.

use log::debug;
use rayon::prelude::*;

use crate::errcode::{GifError, GifResult};
use crate::frame::{DedupRun, PalettedRun, RawFrame};

// NeuQuant sampling factor: 1 samples every pixel, 30 is fastest.
const QUANTIZE_SPEED: i32 = 10;

/// Quantize all runs concurrently, preserving order and repetition
/// counts.
///
/// If any frame fails to quantize, the whole operation reports a
/// single error and produces no output.
pub fn palettize(runs: Vec<DedupRun>)
        -> GifResult<Vec<PalettedRun>> {
    debug!("quantizing {} run(s)", runs.len());

    runs.into_par_iter()
        .map(|run| {
            let frame = quantize(run.frame)?;
            Ok(PalettedRun { frame, repeat: run.repeat })
        })
        .collect()
}

/// Quantize one frame down to at most 256 colours.
///
/// The GIF image descriptor stores dimensions as 16-bit values, so
/// anything wider or taller than 65535 pixels cannot be represented.
fn quantize(frame: RawFrame)
        -> GifResult<gif::Frame<'static>> {
    let (w, h) = frame.image.dimensions();
    if w == 0 || h == 0 || w > u16::MAX as u32 || h > u16::MAX as u32 {
        return Err(GifError::WrongResolution(frame.path));
    }

    let mut pixels = frame.image.into_raw();
    Ok(gif::Frame::from_rgba_speed(w as u16, h as u16, &mut pixels, QUANTIZE_SPEED))
}
