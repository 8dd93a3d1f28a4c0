//! Compact icon summaries for perceptual comparison.
//!
//! An icon is an 11x11 downsample of the source frame, stored as three
//! YCbCr channel planes, plus the source's width-to-height proportion.
//! Two frames are compared through their icons only; the full rasters
//! are never diffed pixel by pixel.

use image::imageops;
use log::trace;

use crate::dedup::Similarity;
use crate::frame::RawFrame;

/// Icon edge length in pixels.
pub const ICON_SIZE: u32 = 11;

/// Compact YCbCr summary of one frame.
pub struct Icon {
    // Source width / height, before downsampling.
    ratio: f64,

    y: Vec<f64>,
    cb: Vec<f64>,
    cr: Vec<f64>,
}

/// The default similarity oracle: icon downsampling plus per-channel
/// Euclidean distances in YCbCr space.
#[derive(Clone, Copy, Debug, Default)]
pub struct IconSimilarity;

impl Similarity for IconSimilarity {
    type Icon = Icon;

    fn summarize(&self, frame: &RawFrame) -> Icon {
        let (w, h) = frame.image.dimensions();
        let small = imageops::thumbnail(&frame.image, ICON_SIZE, ICON_SIZE);

        let n = (small.width() * small.height()) as usize;
        let mut y = Vec::with_capacity(n);
        let mut cb = Vec::with_capacity(n);
        let mut cr = Vec::with_capacity(n);

        for p in small.pixels() {
            let [r, g, b, _] = p.0;
            let (py, pcb, pcr) = ycbcr(r, g, b);
            y.push(py);
            cb.push(pcb);
            cr.push(pcr);
        }

        trace!("icon for {:?}: {} sample(s)", frame.path, n);

        Icon {
            ratio: w as f64 / h as f64,
            y,
            cb,
            cr,
        }
    }

    fn prop_metric(&self, a: &Icon, b: &Icon) -> f64 {
        let big = a.ratio.max(b.ratio);
        if big > 0.0 {
            (a.ratio - b.ratio).abs() / big
        } else {
            0.0
        }
    }

    fn euc_metric(&self, a: &Icon, b: &Icon) -> (f64, f64, f64) {
        (distance(&a.y, &b.y), distance(&a.cb, &b.cb), distance(&a.cr, &b.cr))
    }
}

/// ITU-R BT.601 conversion, full range.
fn ycbcr(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64, g as f64, b as f64);

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168736 * r - 0.331264 * g + 0.418688 * b;
    let cr = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;

    (y, cb, cr)
}

/// Euclidean distance between two channel planes.
fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
}
