use std::fmt;

use crate::tag_type::TagType;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The two broad families of failure a single map document can hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte stream itself was bad: decompression failed, or the tag stream was malformed or
    /// truncated.
    Format,
    /// The tag tree decoded fine, but didn't hold the map fields we need, or held color indices
    /// the palette can't resolve.
    Schema,
}

#[derive(Debug)]
pub enum Error {
    /// Occurs when gzip decompression fails: a bad header, a truncated stream, or a checksum
    /// mismatch.
    FailDecompress(String),
    /// Decompressed data was greater than the maximum allowed size.
    LengthTooLong { max: usize, actual: usize },
    /// Tag stream ended too early.
    LengthTooShort {
        step: &'static str,
        offset: usize,
        expected: usize,
        actual: usize,
    },
    /// A type id outside of 0-12 was found.
    UnknownTagType { id: u8, offset: usize },
    /// Basic tag encoding failure.
    BadEncode { offset: usize, msg: String },
    /// Decoding or encoding hit some parsing limit.
    ParseLimit(String),
    /// A field along the navigation path wasn't present.
    MissingField(String),
    /// A field along the navigation path was present, but held the wrong kind of tag.
    UnexpectedType {
        field: String,
        expected: TagType,
        actual: TagType,
    },
    /// A color index didn't resolve to any palette entry.
    IndexOutOfRange {
        index: u8,
        position: usize,
        palette_len: usize,
    },
    /// The color array didn't hold exactly one index per pixel.
    BadDimensions { expected: usize, actual: usize },
    /// A base color table failed to load or didn't meet the table's invariants.
    BadPalette(String),
}

impl Error {
    /// Classify this error as either a format or a schema failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FailDecompress(_)
            | Error::LengthTooLong { .. }
            | Error::LengthTooShort { .. }
            | Error::UnknownTagType { .. }
            | Error::BadEncode { .. }
            | Error::ParseLimit(_) => ErrorKind::Format,
            Error::MissingField(_)
            | Error::UnexpectedType { .. }
            | Error::IndexOutOfRange { .. }
            | Error::BadDimensions { .. }
            | Error::BadPalette(_) => ErrorKind::Schema,
        }
    }

    pub fn is_format(&self) -> bool {
        self.kind() == ErrorKind::Format
    }

    pub fn is_schema(&self) -> bool {
        self.kind() == ErrorKind::Schema
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::FailDecompress(ref err) => write!(f, "decompression failed: {}", err),
            Error::LengthTooLong { max, actual } => write!(
                f,
                "Data too long: was at least {} bytes, maximum allowed is {}",
                actual, max
            ),
            Error::LengthTooShort {
                step,
                offset,
                expected,
                actual,
            } => write!(
                f,
                "truncated tag stream: expected {} bytes at offset {}, but got {} on step [{}]",
                expected, offset, actual, step
            ),
            Error::UnknownTagType { id, offset } => {
                write!(f, "unknown tag type {} at offset {}", id, offset)
            }
            Error::BadEncode { offset, ref msg } => {
                write!(f, "Bad tag encoding at offset {}: {}", offset, msg)
            }
            Error::ParseLimit(ref err) => write!(f, "Hit parsing limit: {}", err),
            Error::MissingField(ref name) => write!(f, "expected field '{}' not found", name),
            Error::UnexpectedType {
                ref field,
                expected,
                actual,
            } => write!(
                f,
                "field '{}' has unexpected type: expected {}, got {}",
                field,
                expected.name(),
                actual.name()
            ),
            Error::IndexOutOfRange {
                index,
                position,
                palette_len,
            } => write!(
                f,
                "color index out of range: {} at position {} (palette holds {} colors)",
                index, position, palette_len
            ),
            Error::BadDimensions { expected, actual } => write!(
                f,
                "color array holds {} indices, but the map needs {}",
                actual, expected
            ),
            Error::BadPalette(ref err) => write!(f, "Bad base color table: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl std::convert::From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::BadPalette(e.to_string())
    }
}
