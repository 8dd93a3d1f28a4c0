//! GIF builder error codes.

use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type GifResult<T> = Result<T, GifError>;

/// Broad failure category.
///
/// Callers that only need to distinguish "could not read the sources"
/// from "could not produce the output" can match on this instead of
/// the full error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Category {
    Source,
    Encode,
    Assembly,
}

#[derive(Debug)]
pub enum GifError {
    // No input frames were supplied.
    NoFrames,

    NoFile(PathBuf),
    NotARegularFile(PathBuf),
    BadMagic(PathBuf),
    Decode(PathBuf, image::ImageError),

    // Frame dimensions exceed the GIF format's 65535 pixel bound.
    WrongResolution(PathBuf),
    BadEncoding(gif::EncodingError),

    // Destination file could not be created or fully written.
    Assembly(PathBuf, io::Error),

    // IO error.
    Io(io::Error),
}

impl GifError {
    /// The broad category this error belongs to.
    pub fn category(&self) -> Category {
        use self::GifError::*;
        match *self {
            NoFrames => Category::Source,
            NoFile(_) => Category::Source,
            NotARegularFile(_) => Category::Source,
            BadMagic(_) => Category::Source,
            Decode(..) => Category::Source,
            WrongResolution(_) => Category::Encode,
            BadEncoding(_) => Category::Encode,
            Assembly(..) => Category::Assembly,
            Io(_) => Category::Assembly,
        }
    }
}

impl fmt::Display for GifError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::GifError::*;
        match *self {
            NoFrames => write!(f, "No input frames"),
            NoFile(ref path) => write!(f, "File not found: {}", path.display()),
            NotARegularFile(ref path) => write!(f, "Not a regular file: {}", path.display()),
            BadMagic(ref path) => write!(f, "Bad magic: {}", path.display()),
            Decode(ref path, ref err) => write!(f, "Failed to decode {}: {}", path.display(), err),
            WrongResolution(ref path) => write!(f, "Wrong resolution: {}", path.display()),
            BadEncoding(ref err) => write!(f, "Encoding error: {}", err),
            Assembly(ref path, ref err) => write!(f, "Failed to write {}: {}", path.display(), err),
            Io(ref err) => write!(f, "IO error: {}", err),
        }
    }
}

impl error::Error for GifError {
    /// The lower level cause of this error, if any.
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        use self::GifError::*;
        match *self {
            Decode(_, ref err) => Some(err),
            BadEncoding(ref err) => Some(err),
            Assembly(_, ref err) => Some(err),
            Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for GifError {
    fn from(err: io::Error) -> GifError {
        GifError::Io(err)
    }
}

impl From<gif::EncodingError> for GifError {
    fn from(err: gif::EncodingError) -> GifError {
        match err {
            gif::EncodingError::Io(err) => GifError::Io(err),
            err => GifError::BadEncoding(err),
        }
    }
}
