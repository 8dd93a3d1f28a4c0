//! Frame deduplication.
//!
//! Consecutive frames that the similarity oracle judges identical are
//! collapsed into a single representative frame plus a repetition
//! count.  Displaying one stored frame for longer replaces storing the
//! same frame several times over, which is where the output size win
//! comes from.

use log::debug;

use crate::errcode::GifResult;
use crate::frame::{DedupRun, RawFrame};

/// Tolerance on the normalised proportion difference between two
/// frames.  Frames whose proportions differ by more than this are
/// different without any further test.
pub const PROP_TOLERANCE: f64 = 0.001;

/// Upper bound on the luma (Y) channel distance between two icons.
pub const THRESHOLD_Y: f64 = 100.0;

/// Upper bound on either chroma (Cb, Cr) channel distance between two
/// icons.
pub const THRESHOLD_CBCR: f64 = 200.0;

/// Perceptual-similarity oracle.
///
/// [`summarize`](Self::summarize) reduces a frame to a compact,
/// fixed-size summary ("icon"); the metric functions compare two such
/// summaries.  The deduplicator only depends on this contract, so an
/// alternate similarity strategy can be substituted without touching
/// its control flow.
pub trait Similarity {
    type Icon;

    /// Reduce a frame to its compact summary.
    fn summarize(&self, frame: &RawFrame) -> Self::Icon;

    /// Normalised difference between the source images' proportions.
    fn prop_metric(&self, a: &Self::Icon, b: &Self::Icon) -> f64;

    /// Per-channel Euclidean distances in YCbCr space: (y, cb, cr).
    fn euc_metric(&self, a: &Self::Icon, b: &Self::Icon) -> (f64, f64, f64);
}

/// Two-stage identity test: proportions first, then per-channel
/// distances in YCbCr space against the fixed thresholds.
fn icons_equal<S: Similarity>(oracle: &S, a: &S::Icon, b: &S::Icon) -> bool {
    if oracle.prop_metric(a, b) > PROP_TOLERANCE {
        return false;
    }

    let (dy, dcb, dcr) = oracle.euc_metric(a, b);
    if dy > THRESHOLD_Y {
        return false;
    }
    if dcb > THRESHOLD_CBCR || dcr > THRESHOLD_CBCR {
        return false;
    }
    true
}

/// Collapse a decoded frame sequence into dedup runs.
///
/// Each incoming frame is compared against the current run's original
/// representative, never against the most recent duplicate, so a
/// slowly drifting sequence still breaks into runs once it drifts far
/// enough from the first frame.  The final run is emitted
/// unconditionally; an empty sequence yields no runs.
///
/// The first decode error aborts the whole operation.
pub fn collapse<I, S>(frames: I, oracle: &S)
        -> GifResult<Vec<DedupRun>>
        where I: IntoIterator<Item = GifResult<RawFrame>>,
              S: Similarity {
    let mut runs = Vec::new();
    let mut current: Option<(RawFrame, S::Icon, u32)> = None;

    for frame in frames {
        let frame = frame?;
        let icon = oracle.summarize(&frame);

        match current.take() {
            None => {
                current = Some((frame, icon, 1));
            }
            Some((rep, rep_icon, repeat)) => {
                if icons_equal(oracle, &rep_icon, &icon) {
                    current = Some((rep, rep_icon, repeat + 1));
                } else {
                    debug!("run of {} broken by {:?}", repeat, frame.path);
                    runs.push(DedupRun { frame: rep, repeat });
                    current = Some((frame, icon, 1));
                }
            }
        }
    }

    if let Some((rep, _, repeat)) = current {
        runs.push(DedupRun { frame: rep, repeat });
    }

    Ok(runs)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::errcode::{GifError, GifResult};
    use crate::frame::RawFrame;
    use super::{collapse, icons_equal, Similarity};
    use super::{PROP_TOLERANCE, THRESHOLD_CBCR, THRESHOLD_Y};

    /// Summarizes a frame down to its top-left red channel, and reports
    /// the channel difference as the luma distance.  Frames are then
    /// "identical" exactly when their values are within THRESHOLD_Y.
    struct ByteOracle;

    impl Similarity for ByteOracle {
        type Icon = u8;

        fn summarize(&self, frame: &RawFrame) -> u8 {
            frame.image.get_pixel(0, 0).0[0]
        }

        fn prop_metric(&self, _: &u8, _: &u8) -> f64 {
            0.0
        }

        fn euc_metric(&self, a: &u8, b: &u8) -> (f64, f64, f64) {
            ((*a as f64 - *b as f64).abs(), 0.0, 0.0)
        }
    }

    /// Reports fixed metrics regardless of input.
    struct FixedOracle(f64, f64, f64, f64);

    impl Similarity for FixedOracle {
        type Icon = ();

        fn summarize(&self, _: &RawFrame) -> () {}

        fn prop_metric(&self, _: &(), _: &()) -> f64 {
            self.0
        }

        fn euc_metric(&self, _: &(), _: &()) -> (f64, f64, f64) {
            (self.1, self.2, self.3)
        }
    }

    fn solid(value: u8) -> GifResult<RawFrame> {
        Ok(RawFrame {
            path: PathBuf::from(format!("{:03}.png", value)),
            image: image::RgbaImage::from_pixel(
                    2, 2, image::Rgba([value, value, value, 255])),
        })
    }

    fn repeats(frames: Vec<GifResult<RawFrame>>) -> Vec<u32> {
        collapse(frames, &ByteOracle).unwrap()
                .iter().map(|run| run.repeat).collect()
    }

    #[test]
    fn test_empty_sequence() {
        let runs = collapse(Vec::new(), &ByteOracle).unwrap();
        assert_eq!(runs.len(), 0);
    }

    #[test]
    fn test_single_frame() {
        assert_eq!(&repeats(vec![solid(0)])[..], [1]);
    }

    #[test]
    fn test_all_identical() {
        let frames = vec![solid(7), solid(7), solid(7), solid(7)];
        assert_eq!(&repeats(frames)[..], [4]);
    }

    #[test]
    fn test_all_distinct() {
        // Values more than THRESHOLD_Y apart.
        let frames = vec![solid(0), solid(120), solid(240)];
        assert_eq!(&repeats(frames)[..], [1, 1, 1]);
    }

    #[test]
    fn test_mixed_runs() {
        let frames = vec![solid(0), solid(0), solid(240)];
        let runs = collapse(frames, &ByteOracle).unwrap();

        let repeats: Vec<u32> = runs.iter().map(|run| run.repeat).collect();
        assert_eq!(&repeats[..], [2, 1]);
        assert_eq!(runs[0].frame.image.get_pixel(0, 0).0[0], 0);
        assert_eq!(runs[1].frame.image.get_pixel(0, 0).0[0], 240);
    }

    #[test]
    fn test_repeats_sum_to_input_length() {
        let frames = vec![
            solid(0), solid(0), solid(120), solid(240),
            solid(240), solid(240), solid(0) ];
        let total: u32 = repeats(frames).iter().sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn test_representative_not_updated() {
        // 90 is within THRESHOLD_Y of 0, and 180 is within THRESHOLD_Y
        // of 90.  Comparing against the run's original representative
        // must still split the sequence at 180.
        let frames = vec![solid(0), solid(90), solid(180)];
        let runs = collapse(frames, &ByteOracle).unwrap();

        let repeats: Vec<u32> = runs.iter().map(|run| run.repeat).collect();
        assert_eq!(&repeats[..], [2, 1]);
        assert_eq!(runs[0].frame.image.get_pixel(0, 0).0[0], 0);
        assert_eq!(runs[1].frame.image.get_pixel(0, 0).0[0], 180);
    }

    #[test]
    fn test_decode_error_aborts() {
        let frames = vec![
            solid(0),
            Err(GifError::BadMagic(PathBuf::from("bad.png"))),
            solid(240) ];

        match collapse(frames, &ByteOracle) {
            Err(GifError::BadMagic(p)) => assert_eq!(p, PathBuf::from("bad.png")),
            res => panic!("unexpected result: {:?}", res.map(|_| ())),
        }
    }

    #[test]
    fn test_proportion_gate_runs_first() {
        // Zero colour distance, but proportions differ: different.
        let a = FixedOracle(0.002, 0.0, 0.0, 0.0);
        assert!(!icons_equal(&a, &(), &()));
    }

    #[test]
    fn test_distance_gates() {
        assert!(icons_equal(&FixedOracle(0.0, 100.0, 200.0, 200.0), &(), &()));
        assert!(!icons_equal(&FixedOracle(0.0, 100.1, 0.0, 0.0), &(), &()));
        assert!(!icons_equal(&FixedOracle(0.0, 0.0, 200.1, 0.0), &(), &()));
        assert!(!icons_equal(&FixedOracle(0.0, 0.0, 0.0, 200.1), &(), &()));
    }

    #[test]
    fn test_reference_thresholds() {
        // Values taken from the reference implementation.  Any change
        // here changes which frames merge; do not tweak casually.
        assert_eq!(PROP_TOLERANCE, 0.001);
        assert_eq!(THRESHOLD_Y, 100.0);
        assert_eq!(THRESHOLD_CBCR, 200.0);
    }
}
