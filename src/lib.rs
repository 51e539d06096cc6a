//! map-raster decodes a game's persisted map records and turns them into RGB images.
//!
//! A map record is a gzip-compressed binary tag tree: a self-describing format of typed,
//! nested, named tags. Converting one takes a few steps:
//!
//! 1. [`compress::decompress`] inflates the gzip frame.
//! 2. [`from_bytes`] decodes the raw stream into a [`NamedTag`] tree.
//! 3. [`find_colors`] walks `data` → `colors` to the map's color index bytes.
//! 4. A [`Rasterizer`] maps each index through a [`Palette`], built from the table of
//!    [`BASE_COLORS`], into a 128×128 [`MapImage`].
//!
//! [`MapConverter`] runs the whole pipeline on any byte source. Maps that were never drawn on
//! (every index zero) come back as [`Rendered::Blank`] rather than as an image. Nothing here
//! touches the filesystem or encodes image files; hand [`MapImage::to_rgb_bytes`] to an encoder
//! of your choice.
//!
//! ```
//! use map_raster::{compress, to_bytes, Compound, MapConverter, NamedTag};
//!
//! let mut colors = vec![0i8; 128 * 128];
//! colors[0] = 30;
//! let data = Compound::new().with("colors", colors);
//! let doc = NamedTag::new("", Compound::new().with("data", data));
//! let file = compress::compress(&to_bytes(&doc)?)?;
//!
//! let conv = MapConverter::default().convert(file.as_slice())?;
//! let image = conv.rendered.image().unwrap();
//! assert_eq!(image.pixel(0, 0), Some([0, 124, 0]));
//! # Ok::<(), map_raster::Error>(())
//! ```
//!
//! Each document is processed independently, and a [`MapConverter`] holds only immutable
//! state, so one converter can be shared between threads converting different documents.

mod base_colors;
mod convert;
mod decode;
mod depth_tracking;
mod encode;
mod error;
mod tag;
mod tag_type;

pub mod batch;
pub mod compress;
pub mod navigate;
pub mod palette;
pub mod raster;

pub use base_colors::BASE_COLORS;
pub use convert::{Conversion, ConvertOptions, MapConverter};
pub use decode::{from_bytes, from_bytes_exact, Parser};
pub use encode::{to_bytes, TagEncoder};
pub use error::{Error, ErrorKind, Result};
pub use navigate::find_colors;
pub use palette::{BaseColor, ColorFamily, Palette, Rgb};
pub use raster::{MapImage, Rasterizer, Rendered};
pub use tag::{Compound, NamedTag, Tag, TagList};
pub use tag_type::TagType;

/// The maximum allowed size of an inflated document is 16 MiB. A map record is around 16 kiB,
/// so this only stops runaway decompression.
pub const MAX_DOC_SIZE: usize = 1usize << 24; // 16 MiB

/// The maximum nesting depth of lists and compounds. Decoding recurses once per level, so this
/// also bounds stack use; map records nest three levels deep.
pub const MAX_DEPTH: usize = 128;
