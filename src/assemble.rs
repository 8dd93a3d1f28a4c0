//! GIF assembly.
//!
//! Converts repetition counts into per-frame display delays and
//! serializes the ordered frame set into a single animated-GIF byte
//! stream.
//!
//! GIF stores one delay per frame, in hundredths of a second, in that
//! frame's graphic control extension.  A run of `r` duplicate source
//! frames is therefore stored once with `r` times the base delay,
//! instead of `r` times with the base delay.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gif::{Encoder, Repeat};
use log::debug;

use crate::errcode::{GifError, GifResult};
use crate::frame::PalettedRun;

/// Frame rate substituted when the caller passes 0.
pub const DEFAULT_FPS: u32 = 30;

/// Centiseconds of display time per source frame at the given frame
/// rate: floor(100 / fps).
///
/// A run with repetition count `r` is stored with a delay of `r`
/// times this unit.
pub fn delay_unit(fps: u32) -> u16 {
    let fps = if fps == 0 { DEFAULT_FPS } else { fps };
    (100 / fps) as u16
}

/// Serialize runs into an animated GIF.
///
/// The logical screen takes the first frame's dimensions.  Every
/// stored frame carries its own local colour table and its computed
/// delay.  The animation loops forever, matching the reference tool.
pub fn write_gif<W: Write>(runs: Vec<PalettedRun>, fps: u32, w: W)
        -> GifResult<()> {
    let (screen_w, screen_h) = match runs.first() {
        Some(run) => (run.frame.width, run.frame.height),
        None => return Err(GifError::NoFrames),
    };

    let unit = delay_unit(fps);
    debug!("assembling {} frame(s), {} cs per source frame", runs.len(), unit);

    let mut encoder = Encoder::new(w, screen_w, screen_h, &[])?;
    encoder.set_repeat(Repeat::Infinite)?;

    for mut run in runs {
        let delay = (unit as u64).saturating_mul(run.repeat as u64);
        run.frame.delay = delay.min(u16::MAX as u64) as u16;
        encoder.write_frame(&run.frame)?;
    }

    let mut w = encoder.into_inner()?;
    w.flush()?;

    Ok(())
}

/// Serialize runs into an animated GIF file at `filename`.
///
/// The file is created (or truncated), fully written, and closed.  On
/// failure the destination is not usable; only "file creation was
/// attempted" is guaranteed.
pub fn save_gif(runs: Vec<PalettedRun>, fps: u32, filename: &Path)
        -> GifResult<()> {
    let file = File::create(filename)
            .map_err(|e| GifError::Assembly(filename.to_path_buf(), e))?;

    write_gif(runs, fps, BufWriter::new(file)).map_err(|e| match e {
        GifError::Io(e) => GifError::Assembly(filename.to_path_buf(), e),
        e => e,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use crate::encode::palettize;
    use crate::errcode::GifError;
    use crate::frame::{DedupRun, RawFrame};
    use super::{delay_unit, write_gif};

    fn run(rgb: [u8; 3], repeat: u32) -> DedupRun {
        DedupRun {
            frame: RawFrame {
                path: PathBuf::from("test.png"),
                image: image::RgbaImage::from_pixel(
                        6, 4, image::Rgba([rgb[0], rgb[1], rgb[2], 255])),
            },
            repeat,
        }
    }

    fn decode(bytes: &[u8]) -> (u16, u16, Vec<u16>) {
        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = opts.read_info(Cursor::new(bytes)).unwrap();

        let (w, h) = (decoder.width(), decoder.height());
        let mut delays = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            delays.push(frame.delay);
        }
        (w, h, delays)
    }

    #[test]
    fn test_delay_unit() {
        assert_eq!(delay_unit(25), 4);
        assert_eq!(delay_unit(30), 3);
        assert_eq!(delay_unit(50), 2);
        assert_eq!(delay_unit(100), 1);
        assert_eq!(delay_unit(1), 100);

        // fps = 0 is treated as 30.
        assert_eq!(delay_unit(0), delay_unit(30));
    }

    #[test]
    fn test_round_trip_frames_and_delays() {
        // Two runs at 25 fps: delays are 4 * repeat centiseconds.
        let runs = palettize(vec![
            run([255, 0, 0], 2),
            run([0, 0, 255], 1) ]).unwrap();

        let mut bytes = Vec::new();
        write_gif(runs, 25, &mut bytes).unwrap();

        let (w, h, delays) = decode(&bytes);
        assert_eq!((w, h), (6, 4));
        assert_eq!(&delays[..], [8, 4]);
    }

    #[test]
    fn test_single_frame_gif() {
        let runs = palettize(vec![run([40, 40, 40], 1)]).unwrap();

        let mut bytes = Vec::new();
        write_gif(runs, 0, &mut bytes).unwrap();

        let (_, _, delays) = decode(&bytes);
        assert_eq!(&delays[..], [3]);
    }

    #[test]
    fn test_no_frames_is_an_error() {
        let mut bytes = Vec::new();
        match write_gif(Vec::new(), 30, &mut bytes) {
            Err(GifError::NoFrames) => (),
            res => panic!("unexpected result: {:?}", res),
        }
        assert_eq!(bytes.len(), 0);
    }

    #[test]
    fn test_delay_saturates() {
        let runs = palettize(vec![run([0, 0, 0], u32::MAX)]).unwrap();

        let mut bytes = Vec::new();
        write_gif(runs, 1, &mut bytes).unwrap();

        let (_, _, delays) = decode(&bytes);
        assert_eq!(&delays[..], [u16::MAX]);
    }
}
