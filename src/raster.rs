use crate::{
    error::{Error, Result},
    palette::{Palette, Rgb},
};

/// Width of a map, in pixels.
pub const MAP_WIDTH: usize = 128;
/// Height of a map, in pixels.
pub const MAP_HEIGHT: usize = 128;

/// An RGB raster, row-major with the origin at the top left. Never mutated once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl MapImage {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Flatten into `width * height * 3` bytes of 8-bit RGB, ready for an image encoder.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    pub fn into_pixels(self) -> Vec<Rgb> {
        self.pixels
    }
}

/// The result of rasterizing one map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    Image(MapImage),
    /// Every index was 0: the map was never drawn on, so no image was produced.
    Blank,
}

impl Rendered {
    pub fn image(&self) -> Option<&MapImage> {
        match self {
            Rendered::Image(img) => Some(img),
            Rendered::Blank => None,
        }
    }

    pub fn into_image(self) -> Option<MapImage> {
        match self {
            Rendered::Image(img) => Some(img),
            Rendered::Blank => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Rendered::Blank)
    }
}

/// Check if a map was never drawn on.
pub fn is_blank(indices: &[i8]) -> bool {
    indices.iter().all(|i| *i == 0)
}

/// Maps color indices through a palette. The palette is immutable, so one rasterizer can be
/// shared across threads.
#[derive(Clone, Debug)]
pub struct Rasterizer {
    palette: Palette,
    skip_blank: bool,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl Rasterizer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            skip_blank: true,
        }
    }

    /// Set whether an all-zero map is reported as [`Rendered::Blank`] (the default) or rendered
    /// as a plain black image.
    pub fn skip_blank(mut self, skip_blank: bool) -> Self {
        self.skip_blank = skip_blank;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Rasterize `width * height` row-major color indices. Each stored byte is read as an
    /// unsigned palette index.
    pub fn rasterize(&self, indices: &[i8], width: usize, height: usize) -> Result<Rendered> {
        let expected = width.saturating_mul(height);
        if indices.len() != expected {
            return Err(Error::BadDimensions {
                expected,
                actual: indices.len(),
            });
        }
        if self.skip_blank && is_blank(indices) {
            return Ok(Rendered::Blank);
        }
        let pixels = indices
            .iter()
            .enumerate()
            .map(|(position, index)| {
                let index = *index as u8;
                self.palette.get(index).ok_or(Error::IndexOutOfRange {
                    index,
                    position,
                    palette_len: self.palette.len(),
                })
            })
            .collect::<Result<Vec<Rgb>>>()?;
        Ok(Rendered::Image(MapImage {
            width,
            height,
            pixels,
        }))
    }
}
