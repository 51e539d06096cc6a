use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{
    compress,
    decode::from_bytes,
    error::Result,
    navigate::find_colors,
    palette::Palette,
    raster::{Rasterizer, Rendered, MAP_HEIGHT, MAP_WIDTH},
    tag::NamedTag,
};

/// Settings for converting map documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ConvertOptions {
    /// Map width in pixels.
    pub width: usize,
    /// Map height in pixels.
    pub height: usize,
    /// Largest inflated document that will be decoded.
    pub max_decompressed_size: usize,
    /// Report never-drawn maps as blank instead of rendering them.
    pub skip_blank: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            max_decompressed_size: crate::MAX_DOC_SIZE,
            skip_blank: true,
        }
    }
}

/// A successfully converted document: its tag tree, and the image (if any) it produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub root: NamedTag,
    pub rendered: Rendered,
}

/// Turns gzip-compressed map documents into RGB images.
#[derive(Clone, Debug, Default)]
pub struct MapConverter {
    rasterizer: Rasterizer,
    options: ConvertOptions,
}

impl MapConverter {
    pub fn new(palette: Palette, options: ConvertOptions) -> Self {
        let rasterizer = Rasterizer::new(palette).skip_blank(options.skip_blank);
        Self {
            rasterizer,
            options,
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn palette(&self) -> &Palette {
        self.rasterizer.palette()
    }

    /// Convert a document read from `src`.
    pub fn convert<R: Read>(&self, src: R) -> Result<Conversion> {
        let raw = compress::decompress(src, self.options.max_decompressed_size)?;
        self.convert_raw(&raw)
    }

    /// Convert an already-inflated tag stream.
    pub fn convert_raw(&self, raw: &[u8]) -> Result<Conversion> {
        let root = from_bytes(raw)?;
        let rendered = self.render(&root)?;
        Ok(Conversion { root, rendered })
    }

    /// Rasterize the colors held in a decoded document.
    pub fn render(&self, root: &NamedTag) -> Result<Rendered> {
        let colors = find_colors(root)?;
        self.rasterizer
            .rasterize(colors, self.options.width, self.options.height)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        encode::to_bytes,
        error::Error,
        tag::{Compound, Tag},
    };

    fn map_doc(colors: Vec<i8>) -> Vec<u8> {
        let data = Compound::new()
            .with("scale", 0i8)
            .with("dimension", 0i8)
            .with("colors", colors);
        let root = NamedTag::new("", Compound::new().with("data", data));
        compress::compress(&to_bytes(&root).unwrap()).unwrap()
    }

    #[test]
    fn converts() {
        let mut colors = vec![0i8; MAP_WIDTH * MAP_HEIGHT];
        colors[0] = 30; // base color 7, shade 2
        let conv = MapConverter::default()
            .convert(map_doc(colors).as_slice())
            .unwrap();
        let img = conv.rendered.image().unwrap();
        assert_eq!(img.pixel(0, 0), Some([0, 124, 0]));
        assert_eq!(img.pixel(1, 0), Some([0, 0, 0]));
        let data = conv.root.root().unwrap().get("data").unwrap();
        assert_eq!(data.as_compound().unwrap().get("scale"), Some(&Tag::Byte(0)));
    }

    #[test]
    fn blank() {
        let conv = MapConverter::default()
            .convert(map_doc(vec![0; MAP_WIDTH * MAP_HEIGHT]).as_slice())
            .unwrap();
        assert!(conv.rendered.is_blank());
    }

    #[test]
    fn not_gzip() {
        let root = NamedTag::new("", Compound::new());
        let raw = to_bytes(&root).unwrap();
        let err = MapConverter::default().convert(raw.as_slice()).unwrap_err();
        assert!(matches!(err, Error::FailDecompress(_)));
        // The same stream is fine once it's known to be inflated.
        let err = MapConverter::default().convert_raw(&raw).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref name) if name == "data"));
    }

    #[test]
    fn truncated_colors() {
        let doc = compress::decompress(map_doc(vec![5; 16384]).as_slice(), 1 << 20).unwrap();
        let cut = compress::compress(&doc[..doc.len() - 100]).unwrap();
        let err = MapConverter::default().convert(cut.as_slice()).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn custom_options() {
        let options = ConvertOptions {
            width: 2,
            height: 2,
            ..Default::default()
        };
        let converter = MapConverter::new(Palette::default(), options);
        let conv = converter.convert(map_doc(vec![4, 5, 6, 7]).as_slice()).unwrap();
        assert_eq!(conv.rendered.image().unwrap().pixels().len(), 4);
        let err = converter.convert(map_doc(vec![4; 5]).as_slice()).unwrap_err();
        assert!(matches!(err, Error::BadDimensions { expected: 4, actual: 5 }));
    }

    #[test]
    fn options_from_json() {
        let options: ConvertOptions = serde_json::from_str(r#"{ "skip_blank": false }"#).unwrap();
        assert_eq!(options.width, MAP_WIDTH);
        assert!(!options.skip_blank);
        assert!(serde_json::from_str::<ConvertOptions>(r#"{ "depth": 1 }"#).is_err());
    }
}
