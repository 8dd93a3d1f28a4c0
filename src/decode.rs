//! Frame decoding.
//!
//! Source images are decoded strictly in the order given, one at a
//! time.  The deduplicator compares each frame against its immediate
//! predecessor, so this stage must never reorder or parallelize.

use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;

use byteorder::BigEndian as BE;
use byteorder::ReadBytesExt;
use image::ImageFormat;
use log::debug;

use crate::errcode::{GifError, GifResult};
use crate::frame::RawFrame;

/// Magic for a PNG file - the first two bytes of the 8-byte signature.
pub const PNG_MAGIC: u16 = 0x8950;

/// Magic for a JPEG file - the SOI marker.
pub const JPEG_MAGIC: u16 = 0xFFD8;

/// Decode a single source image.
///
/// Opens the file, identifies the format from its magic, and decodes
/// it with the format pinned (the extension is not trusted).  Only PNG
/// and JPEG are accepted.  The file handle is released on every exit
/// path.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// gifrun::decode::decode_frame(Path::new("frames/0001.png"));
/// ```
pub fn decode_frame(filename: &Path)
        -> GifResult<RawFrame> {
    if !filename.exists() {
        return Err(GifError::NoFile(filename.to_path_buf()));
    } else if !filename.is_file() {
        return Err(GifError::NotARegularFile(filename.to_path_buf()));
    }

    let decode_err = |e: std::io::Error| {
        GifError::Decode(filename.to_path_buf(), image::ImageError::IoError(e))
    };

    let file = File::open(filename).map_err(decode_err)?;
    let mut r = BufReader::new(file);

    let format = match r.read_u16::<BE>().map_err(decode_err)? {
        PNG_MAGIC => ImageFormat::Png,
        JPEG_MAGIC => ImageFormat::Jpeg,
        _ => return Err(GifError::BadMagic(filename.to_path_buf())),
    };

    r.seek(SeekFrom::Start(0)).map_err(decode_err)?;
    let image = image::load(r, format)
            .map_err(|e| GifError::Decode(filename.to_path_buf(), e))?;

    debug!("decoded {:?} as {:?}", filename, format);

    Ok(RawFrame {
        path: filename.to_path_buf(),
        image: image.into_rgba8(),
    })
}
