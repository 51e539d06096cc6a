//! Decoding of raw (already decompressed) tag streams.
//!
//! The format is self-describing and needs no external schema. All multi-byte integers are
//! big-endian. A named tag is encoded as:
//!
//! ```text
//! +---------+-------------+-------------+---------+
//! | type id | name length | name (UTF8) | payload |
//! | 1 byte  | u16         | n bytes     | ...     |
//! +---------+-------------+-------------+---------+
//! ```
//!
//! Payloads by type id:
//!
//! | Id | Type      | Payload                                                        |
//! | -- | --        | --                                                             |
//! | 0  | End       | none; terminates a Compound                                    |
//! | 1  | Byte      | i8                                                             |
//! | 2  | Short     | i16                                                            |
//! | 3  | Int       | i32                                                            |
//! | 4  | Long      | i64                                                            |
//! | 5  | Float     | f32                                                            |
//! | 6  | Double    | f64                                                            |
//! | 7  | ByteArray | i32 count, then `count` i8                                     |
//! | 8  | String    | u16 length, then UTF-8 bytes                                   |
//! | 9  | List      | element type id, i32 count, then `count` unnamed payloads      |
//! | 10 | Compound  | named tags until a lone End type id                            |
//! | 11 | IntArray  | i32 count, then `count` i32                                    |
//! | 12 | LongArray | i32 count, then `count` i64                                    |
//!
//! A negative count is an error. A List may only declare `End` as its element type when it is
//! empty.

use byteorder::{BigEndian, ByteOrder};

use crate::{
    depth_tracking::DepthTracker,
    error::{Error, Result},
    tag::{Compound, NamedTag, Tag, TagList},
    tag_type::TagType,
};

/// Decode a whole document: a single named Compound. Any bytes following the root are ignored.
pub fn from_bytes(data: &[u8]) -> Result<NamedTag> {
    let mut parser = Parser::new(data);
    parser.read_root()
}

/// Decode a whole document, failing if anything follows the root.
pub fn from_bytes_exact(data: &[u8]) -> Result<NamedTag> {
    let mut parser = Parser::new(data);
    let root = parser.read_root()?;
    if !parser.is_empty() {
        return Err(Error::BadEncode {
            offset: parser.offset(),
            msg: format!("{} trailing bytes after root tag", parser.remaining()),
        });
    }
    Ok(root)
}

#[derive(Clone, Debug)]
pub struct Parser<'a> {
    data: &'a [u8],
    offset: usize,
    depth_tracking: DepthTracker,
}

impl<'a> Parser<'a> {
    pub fn new(data: &'a [u8]) -> Parser<'a> {
        Self {
            data,
            offset: 0,
            depth_tracking: DepthTracker::new(),
        }
    }

    /// Byte offset of the cursor from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn too_short(&self, step: &'static str, expected: usize) -> Error {
        Error::LengthTooShort {
            step,
            offset: self.offset,
            expected,
            actual: self.data.len(),
        }
    }

    fn take(&mut self, len: usize, step: &'static str) -> Result<&'a [u8]> {
        if len > self.data.len() {
            return Err(self.too_short(step, len));
        }
        let (bytes, data) = self.data.split_at(len);
        self.data = data;
        self.offset += len;
        Ok(bytes)
    }

    fn read_i8(&mut self, step: &'static str) -> Result<i8> {
        Ok(self.take(1, step)?[0] as i8)
    }

    fn read_u8(&mut self, step: &'static str) -> Result<u8> {
        Ok(self.take(1, step)?[0])
    }

    fn read_i16(&mut self, step: &'static str) -> Result<i16> {
        Ok(BigEndian::read_i16(self.take(2, step)?))
    }

    fn read_u16(&mut self, step: &'static str) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2, step)?))
    }

    fn read_i32(&mut self, step: &'static str) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4, step)?))
    }

    fn read_i64(&mut self, step: &'static str) -> Result<i64> {
        Ok(BigEndian::read_i64(self.take(8, step)?))
    }

    fn read_f32(&mut self, step: &'static str) -> Result<f32> {
        Ok(BigEndian::read_f32(self.take(4, step)?))
    }

    fn read_f64(&mut self, step: &'static str) -> Result<f64> {
        Ok(BigEndian::read_f64(self.take(8, step)?))
    }

    /// Read a type id byte. Fails on anything outside the known set.
    pub fn read_type(&mut self) -> Result<TagType> {
        let offset = self.offset;
        let id = self.read_u8("decode type id")?;
        TagType::from_u8(id).ok_or(Error::UnknownTagType { id, offset })
    }

    fn read_str(&mut self, step: &'static str) -> Result<String> {
        let len = self.read_u16(step)? as usize;
        let offset = self.offset;
        let bytes = self.take(len, step)?;
        let string = std::str::from_utf8(bytes).map_err(|e| Error::BadEncode {
            offset,
            msg: format!("{}", e),
        })?;
        Ok(string.to_owned())
    }

    // Array and list counts are signed on the wire.
    fn read_count(&mut self, step: &'static str) -> Result<usize> {
        let offset = self.offset;
        let len = self.read_i32(step)?;
        usize::try_from(len).map_err(|_| Error::BadEncode {
            offset,
            msg: format!("Got negative length = {} on step [{}]", len, step),
        })
    }

    // Check an array's full length up front, so a bogus count can't trigger a huge allocation.
    fn read_array_len(&mut self, ty: TagType, step: &'static str) -> Result<usize> {
        let len = self.read_count(step)?;
        let width = ty.fixed_width().unwrap_or(1);
        match len.checked_mul(width) {
            Some(size) if size <= self.data.len() => Ok(len),
            _ => Err(self.too_short(step, len.saturating_mul(width))),
        }
    }

    /// Read the root tag: a named Compound.
    pub fn read_root(&mut self) -> Result<NamedTag> {
        let offset = self.offset;
        let ty = self.read_type()?;
        if ty != TagType::Compound {
            return Err(Error::BadEncode {
                offset,
                msg: format!("Root tag must be a Compound, got {}", ty),
            });
        }
        let name = self.read_str("decode root name")?;
        let tag = self.read_payload(ty)?;
        Ok(NamedTag { name, tag })
    }

    /// Read one named tag. Returns `None` when an End marker is read instead.
    pub fn read_named(&mut self) -> Result<Option<NamedTag>> {
        let ty = self.read_type()?;
        if ty == TagType::End {
            return Ok(None);
        }
        let name = self.read_str("decode tag name")?;
        let tag = self.read_payload(ty)?;
        Ok(Some(NamedTag { name, tag }))
    }

    /// Read an unnamed payload of the given type, recursing through lists and compounds.
    pub fn read_payload(&mut self, ty: TagType) -> Result<Tag> {
        let nested = self.depth_tracking.enter(ty)?;
        let tag = self.parse_payload(ty);
        if nested {
            self.depth_tracking.exit();
        }
        tag
    }

    fn parse_payload(&mut self, ty: TagType) -> Result<Tag> {
        let tag = match ty {
            TagType::End => {
                return Err(Error::BadEncode {
                    offset: self.offset,
                    msg: String::from("End tag has no payload"),
                })
            }
            TagType::Byte => Tag::Byte(self.read_i8("decode Byte")?),
            TagType::Short => Tag::Short(self.read_i16("decode Short")?),
            TagType::Int => Tag::Int(self.read_i32("decode Int")?),
            TagType::Long => Tag::Long(self.read_i64("decode Long")?),
            TagType::Float => Tag::Float(self.read_f32("decode Float")?),
            TagType::Double => Tag::Double(self.read_f64("decode Double")?),
            TagType::ByteArray => {
                let len = self.read_array_len(ty, "decode ByteArray")?;
                let bytes = self.take(len, "get ByteArray content")?;
                Tag::ByteArray(bytes.iter().map(|b| *b as i8).collect())
            }
            TagType::String => Tag::String(self.read_str("decode String")?),
            TagType::List => Tag::List(self.read_list()?),
            TagType::Compound => Tag::Compound(self.read_compound()?),
            TagType::IntArray => {
                let len = self.read_array_len(ty, "decode IntArray")?;
                let mut v = Vec::with_capacity(len);
                for _ in 0..len {
                    v.push(self.read_i32("get IntArray content")?);
                }
                Tag::IntArray(v)
            }
            TagType::LongArray => {
                let len = self.read_array_len(ty, "decode LongArray")?;
                let mut v = Vec::with_capacity(len);
                for _ in 0..len {
                    v.push(self.read_i64("get LongArray content")?);
                }
                Tag::LongArray(v)
            }
        };
        Ok(tag)
    }

    // The recursive payloads get frames of their own, keeping `parse_payload` small at every
    // level of nesting.
    #[inline(never)]
    fn read_list(&mut self) -> Result<TagList> {
        let kind = self.read_type()?;
        let offset = self.offset;
        let len = self.read_count("decode List length")?;
        if kind == TagType::End && len > 0 {
            return Err(Error::BadEncode {
                offset,
                msg: format!("Got List of End with length = {}", len),
            });
        }
        let fits = self.data.len() / kind.min_payload_width().max(1);
        let mut items = Vec::with_capacity(len.min(fits));
        for _ in 0..len {
            items.push(self.read_payload(kind)?);
        }
        Ok(TagList::from_parts(kind, items))
    }

    #[inline(never)]
    fn read_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::new();
        loop {
            let offset = self.offset;
            let Some(NamedTag { name, tag }) = self.read_named()? else {
                break;
            };
            if compound.contains_key(&name) {
                return Err(Error::BadEncode {
                    offset,
                    msg: format!("Duplicate field '{}' in Compound", name),
                });
            }
            compound.insert(name, tag);
        }
        Ok(compound)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::to_bytes;

    // Hand-assembled documents, so these don't depend on the encoder.
    fn named_header(ty: u8, name: &str) -> Vec<u8> {
        let mut v = vec![ty];
        v.extend_from_slice(&(name.len() as u16).to_be_bytes());
        v.extend_from_slice(name.as_bytes());
        v
    }

    fn root_with(body: &[u8]) -> Vec<u8> {
        let mut v = named_header(10, "");
        v.extend_from_slice(body);
        v.push(0);
        v
    }

    #[test]
    fn empty_root() {
        let root = from_bytes(&[10, 0, 0, 0]).unwrap();
        assert_eq!(root.name, "");
        assert!(root.root().unwrap().is_empty());
    }

    #[test]
    fn root_must_be_compound() {
        let data = [1, 0, 0, 5];
        let err = from_bytes(&data).unwrap_err();
        assert!(matches!(err, Error::BadEncode { offset: 0, .. }));
    }

    #[test]
    fn trailing_bytes() {
        let data = [10, 0, 0, 0, 0xFF];
        assert!(from_bytes(&data).is_ok());
        assert!(from_bytes_exact(&data).is_err());
    }

    mod scalars {
        use super::*;

        #[test]
        fn all_widths() {
            let mut body = named_header(1, "b");
            body.push(0xFE);
            body.extend(named_header(2, "s"));
            body.extend_from_slice(&(-300i16).to_be_bytes());
            body.extend(named_header(3, "i"));
            body.extend_from_slice(&0x0102_0304i32.to_be_bytes());
            body.extend(named_header(4, "l"));
            body.extend_from_slice(&i64::MIN.to_be_bytes());
            body.extend(named_header(5, "f"));
            body.extend_from_slice(&1.5f32.to_be_bytes());
            body.extend(named_header(6, "d"));
            body.extend_from_slice(&(-0.25f64).to_be_bytes());
            let root = from_bytes_exact(&root_with(&body)).unwrap();
            let c = root.root().unwrap();
            assert_eq!(c.get("b"), Some(&Tag::Byte(-2)));
            assert_eq!(c.get("s"), Some(&Tag::Short(-300)));
            assert_eq!(c.get("i"), Some(&Tag::Int(0x0102_0304)));
            assert_eq!(c.get("l"), Some(&Tag::Long(i64::MIN)));
            assert_eq!(c.get("f"), Some(&Tag::Float(1.5)));
            assert_eq!(c.get("d"), Some(&Tag::Double(-0.25)));
            assert_eq!(c.names().collect::<Vec<_>>(), ["b", "s", "i", "l", "f", "d"]);
        }

        #[test]
        fn truncated_int() {
            let mut body = named_header(3, "i");
            body.extend_from_slice(&[0, 1]);
            let mut data = named_header(10, "");
            data.extend(body);
            let err = from_bytes(&data).unwrap_err();
            assert!(err.is_format());
            assert!(matches!(
                err,
                Error::LengthTooShort {
                    expected: 4,
                    actual: 2,
                    ..
                }
            ));
        }
    }

    mod strings {
        use super::*;

        #[test]
        fn utf8() {
            let text = "Fühler ✓";
            let mut body = named_header(8, "name");
            body.extend_from_slice(&(text.len() as u16).to_be_bytes());
            body.extend_from_slice(text.as_bytes());
            let root = from_bytes(&root_with(&body)).unwrap();
            assert_eq!(root.root().unwrap().get("name").unwrap().as_str(), Some(text));
        }

        #[test]
        fn invalid_utf8() {
            let mut body = named_header(8, "name");
            body.extend_from_slice(&[0, 2, 0xC3, 0x28]);
            let err = from_bytes(&root_with(&body)).unwrap_err();
            assert!(matches!(err, Error::BadEncode { .. }));
        }
    }

    mod arrays {
        use super::*;

        #[test]
        fn byte_array() {
            let mut body = named_header(7, "colors");
            body.extend_from_slice(&3i32.to_be_bytes());
            body.extend_from_slice(&[0x00, 0x7F, 0xF3]);
            let root = from_bytes(&root_with(&body)).unwrap();
            let colors = root.root().unwrap().get("colors").unwrap();
            assert_eq!(colors.as_byte_array(), Some(&[0i8, 127, -13][..]));
        }

        #[test]
        fn int_and_long_arrays() {
            let mut body = named_header(11, "ints");
            body.extend_from_slice(&2i32.to_be_bytes());
            body.extend_from_slice(&(-1i32).to_be_bytes());
            body.extend_from_slice(&7i32.to_be_bytes());
            body.extend(named_header(12, "longs"));
            body.extend_from_slice(&1i32.to_be_bytes());
            body.extend_from_slice(&(1i64 << 40).to_be_bytes());
            let root = from_bytes_exact(&root_with(&body)).unwrap();
            let c = root.root().unwrap();
            assert_eq!(c.get("ints").unwrap().as_int_array(), Some(&[-1, 7][..]));
            assert_eq!(
                c.get("longs").unwrap().as_long_array(),
                Some(&[1i64 << 40][..])
            );
        }

        #[test]
        fn count_larger_than_data() {
            let mut data = named_header(10, "");
            data.extend(named_header(7, "colors"));
            data.extend_from_slice(&16384i32.to_be_bytes());
            data.extend_from_slice(&[1, 2, 3, 4]);
            let err = from_bytes(&data).unwrap_err();
            assert!(matches!(
                err,
                Error::LengthTooShort {
                    expected: 16384,
                    actual: 4,
                    ..
                }
            ));
        }

        #[test]
        fn huge_long_array_count() {
            let mut data = named_header(10, "");
            data.extend(named_header(12, "l"));
            data.extend_from_slice(&i32::MAX.to_be_bytes());
            let err = from_bytes(&data).unwrap_err();
            assert!(matches!(err, Error::LengthTooShort { .. }));
        }

        #[test]
        fn negative_count() {
            let mut body = named_header(7, "colors");
            body.extend_from_slice(&(-1i32).to_be_bytes());
            let err = from_bytes(&root_with(&body)).unwrap_err();
            assert!(err.is_format());
            assert!(matches!(err, Error::BadEncode { .. }));
        }
    }

    mod lists {
        use super::*;

        #[test]
        fn empty_end_list() {
            let mut body = named_header(9, "banners");
            body.push(0);
            body.extend_from_slice(&0i32.to_be_bytes());
            let root = from_bytes_exact(&root_with(&body)).unwrap();
            let list = root.root().unwrap().get("banners").unwrap().as_list().unwrap();
            assert_eq!(list.kind(), TagType::End);
            assert!(list.is_empty());
        }

        #[test]
        fn nonempty_end_list() {
            let mut body = named_header(9, "bad");
            body.push(0);
            body.extend_from_slice(&1i32.to_be_bytes());
            assert!(from_bytes(&root_with(&body)).is_err());
        }

        #[test]
        fn homogeneous() {
            let mut body = named_header(9, "shorts");
            body.push(2);
            body.extend_from_slice(&3i32.to_be_bytes());
            for v in [1i16, -2, 3] {
                body.extend_from_slice(&v.to_be_bytes());
            }
            let root = from_bytes_exact(&root_with(&body)).unwrap();
            let list = root.root().unwrap().get("shorts").unwrap().as_list().unwrap();
            assert_eq!(list.kind(), TagType::Short);
            assert_eq!(list.len(), 3);
            assert!(list.iter().all(|t| t.tag_type() == TagType::Short));
        }

        #[test]
        fn list_of_compounds() {
            let mut body = named_header(9, "decorations");
            body.push(10);
            body.extend_from_slice(&2i32.to_be_bytes());
            // First compound: {x: Byte 1}
            body.extend(named_header(1, "x"));
            body.push(1);
            body.push(0);
            // Second compound: empty
            body.push(0);
            let root = from_bytes_exact(&root_with(&body)).unwrap();
            let list = root
                .root()
                .unwrap()
                .get("decorations")
                .unwrap()
                .as_list()
                .unwrap();
            assert_eq!(list.len(), 2);
            let first = list.get(0).unwrap().as_compound().unwrap();
            assert_eq!(first.get("x"), Some(&Tag::Byte(1)));
            assert!(list.get(1).unwrap().as_compound().unwrap().is_empty());
        }

        #[test]
        fn huge_list_count() {
            let mut body = named_header(9, "decorations");
            body.push(10);
            body.extend_from_slice(&i32::MAX.to_be_bytes());
            body.extend_from_slice(&[0, 0, 0]);
            let err = from_bytes(&root_with(&body)).unwrap_err();
            assert!(err.is_format());
            assert!(matches!(err, Error::LengthTooShort { .. }));
        }
    }

    mod compounds {
        use super::*;

        #[test]
        fn nested() {
            let mut body = named_header(10, "data");
            body.extend(named_header(1, "scale"));
            body.push(2);
            body.push(0);
            let root = from_bytes_exact(&root_with(&body)).unwrap();
            let data = root.root().unwrap().get("data").unwrap().as_compound().unwrap();
            assert_eq!(data.get("scale"), Some(&Tag::Byte(2)));
        }

        #[test]
        fn missing_end() {
            let mut data = named_header(10, "");
            data.extend(named_header(1, "scale"));
            data.push(2);
            let err = from_bytes(&data).unwrap_err();
            assert!(matches!(err, Error::LengthTooShort { .. }));
        }

        #[test]
        fn duplicate_field() {
            let mut body = named_header(1, "a");
            body.push(1);
            body.extend(named_header(1, "a"));
            body.push(2);
            let err = from_bytes(&root_with(&body)).unwrap_err();
            assert!(matches!(err, Error::BadEncode { offset: 8, .. }));
        }

        #[test]
        fn unknown_type() {
            let mut body = named_header(13, "odd");
            body.push(0);
            let err = from_bytes(&root_with(&body)).unwrap_err();
            assert!(matches!(err, Error::UnknownTagType { id: 13, offset: 3 }));
        }

        #[test]
        fn depth_limit() {
            let mut data = named_header(10, "");
            for _ in 0..(crate::MAX_DEPTH + 1) {
                data.extend(named_header(10, ""));
            }
            let err = from_bytes(&data).unwrap_err();
            assert!(matches!(err, Error::ParseLimit(_)));
        }

        #[test]
        fn deepest_nesting() {
            // The root counts as the first level.
            let mut data = named_header(10, "");
            for _ in 1..crate::MAX_DEPTH {
                data.extend(named_header(10, ""));
            }
            data.extend(std::iter::repeat(0).take(crate::MAX_DEPTH));
            let root = from_bytes_exact(&data).unwrap();
            let mut depth = 1;
            let mut c = root.root().unwrap();
            while let Some(inner) = c.get("") {
                c = inner.as_compound().unwrap();
                depth += 1;
            }
            assert_eq!(depth, crate::MAX_DEPTH);
            assert_eq!(to_bytes(&root).unwrap(), data);
        }

        #[test]
        fn deep_lists() {
            let mut data = named_header(10, "");
            data.extend(named_header(9, "l"));
            for _ in 0..crate::MAX_DEPTH {
                data.push(9);
                data.extend_from_slice(&1i32.to_be_bytes());
            }
            let err = from_bytes(&data).unwrap_err();
            assert!(matches!(err, Error::ParseLimit(_)));
        }
    }

    // Hand-built streams must re-encode to exactly the bytes they were decoded from.
    mod roundtrip {
        use super::*;

        fn assert_roundtrip(data: &[u8]) {
            let root = from_bytes_exact(data).unwrap();
            assert_eq!(to_bytes(&root).unwrap(), data);
        }

        #[test]
        fn scalars() {
            let mut body = named_header(1, "b");
            body.push(0x80);
            body.extend(named_header(2, "s"));
            body.extend_from_slice(&i16::MIN.to_be_bytes());
            body.extend(named_header(3, "i"));
            body.extend_from_slice(&(-7i32).to_be_bytes());
            body.extend(named_header(4, "l"));
            body.extend_from_slice(&i64::MAX.to_be_bytes());
            body.extend(named_header(6, "d"));
            body.extend_from_slice(&(-0.0f64).to_be_bytes());
            body.extend(named_header(8, "name"));
            body.extend_from_slice(&[0, 3, b'm', b'a', b'p']);
            assert_roundtrip(&root_with(&body));
        }

        #[test]
        fn nan_float() {
            let mut body = named_header(5, "f");
            body.extend_from_slice(&0x7FC0_0001u32.to_be_bytes());
            body.extend(named_header(6, "d"));
            body.extend_from_slice(&0x7FF8_0000_0000_0002u64.to_be_bytes());
            let data = root_with(&body);
            let root = from_bytes_exact(&data).unwrap();
            let f = root.root().unwrap().get("f").unwrap().as_float().unwrap();
            assert!(f.is_nan());
            assert_eq!(to_bytes(&root).unwrap(), data);
        }

        #[test]
        fn empty_end_list() {
            let mut body = named_header(9, "banners");
            body.push(0);
            body.extend_from_slice(&0i32.to_be_bytes());
            assert_roundtrip(&root_with(&body));
        }

        #[test]
        fn list_of_compounds() {
            let mut body = named_header(9, "decorations");
            body.push(10);
            body.extend_from_slice(&2i32.to_be_bytes());
            body.extend(named_header(8, "id"));
            body.extend_from_slice(&[0, 1, b'+']);
            body.extend(named_header(1, "type"));
            body.push(1);
            body.push(0);
            body.push(0);
            assert_roundtrip(&root_with(&body));
        }

        #[test]
        fn arrays_and_field_order() {
            // Field names out of lexical order, to catch any reordering.
            let mut body = named_header(11, "z");
            body.extend_from_slice(&1i32.to_be_bytes());
            body.extend_from_slice(&(-1i32).to_be_bytes());
            body.extend(named_header(7, "colors"));
            body.extend_from_slice(&2i32.to_be_bytes());
            body.extend_from_slice(&[0xF3, 0x22]);
            body.extend(named_header(12, "a"));
            body.extend_from_slice(&0i32.to_be_bytes());
            assert_roundtrip(&root_with(&body));
        }
    }

    #[test]
    fn every_truncation_fails_cleanly() {
        let mut body = named_header(7, "colors");
        body.extend_from_slice(&4i32.to_be_bytes());
        body.extend_from_slice(&[1, 2, 3, 4]);
        body.extend(named_header(9, "l"));
        body.push(3);
        body.extend_from_slice(&1i32.to_be_bytes());
        body.extend_from_slice(&9i32.to_be_bytes());
        body.extend(named_header(8, "s"));
        body.extend_from_slice(&[0, 1, b'x']);
        let data = root_with(&body);
        assert!(from_bytes_exact(&data).is_ok());
        for cut in 0..data.len() {
            let err = from_bytes(&data[..cut]).unwrap_err();
            assert!(err.is_format(), "cut at {} gave {:?}", cut, err);
        }
    }
}
