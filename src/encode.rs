//! Encoding of tag trees into raw tag streams.
//!
//! Given a tree, the output is always the same: compound fields are written in the order they
//! were inserted, so a decoded document re-encodes to exactly the bytes it came from.

use crate::{
    depth_tracking::DepthTracker,
    error::{Error, Result},
    tag::{Compound, NamedTag, Tag, TagList},
    tag_type::TagType,
};

/// Encode a whole document. The root must be a Compound.
pub fn to_bytes(root: &NamedTag) -> Result<Vec<u8>> {
    let mut enc = TagEncoder::default();
    enc.encode_root(root)?;
    Ok(enc.finish())
}

#[derive(Default)]
pub struct TagEncoder {
    depth_tracking: DepthTracker,
    buf: Vec<u8>,
}

impl TagEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn bad(&self, msg: String) -> Error {
        Error::BadEncode {
            offset: self.buf.len(),
            msg,
        }
    }

    pub fn encode_root(&mut self, root: &NamedTag) -> Result<()> {
        if !root.tag.is_compound() {
            return Err(self.bad(format!(
                "Root tag must be a Compound, got {}",
                root.tag.tag_type()
            )));
        }
        self.encode_named(&root.name, &root.tag)
    }

    /// Write a type id, name, and payload.
    pub fn encode_named(&mut self, name: &str, tag: &Tag) -> Result<()> {
        self.buf.push(tag.tag_type().into());
        self.encode_str(name)?;
        self.encode_payload(tag)
    }

    fn encode_str(&mut self, v: &str) -> Result<()> {
        let len = u16::try_from(v.len())
            .map_err(|_| self.bad(format!("String of {} bytes is too long", v.len())))?;
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(v.as_bytes());
        Ok(())
    }

    fn encode_count(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| self.bad(format!("Sequence of {} items is too long", len)))?;
        self.buf.extend_from_slice(&len.to_be_bytes());
        Ok(())
    }

    /// Write an unnamed payload.
    pub fn encode_payload(&mut self, tag: &Tag) -> Result<()> {
        let nested = self.depth_tracking.enter(tag.tag_type())?;
        let result = self.write_payload(tag);
        if nested {
            self.depth_tracking.exit();
        }
        result
    }

    fn write_payload(&mut self, tag: &Tag) -> Result<()> {
        match tag {
            Tag::Byte(v) => self.buf.push(*v as u8),
            Tag::Short(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Tag::Int(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Tag::Long(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Tag::Float(v) => self.buf.extend_from_slice(&v.to_bits().to_be_bytes()),
            Tag::Double(v) => self.buf.extend_from_slice(&v.to_bits().to_be_bytes()),
            Tag::ByteArray(v) => {
                self.encode_count(v.len())?;
                self.buf.extend(v.iter().map(|b| *b as u8));
            }
            Tag::String(v) => self.encode_str(v)?,
            Tag::List(list) => self.write_list(list)?,
            Tag::Compound(compound) => self.write_compound(compound)?,
            Tag::IntArray(v) => {
                self.encode_count(v.len())?;
                for i in v {
                    self.buf.extend_from_slice(&i.to_be_bytes());
                }
            }
            Tag::LongArray(v) => {
                self.encode_count(v.len())?;
                for i in v {
                    self.buf.extend_from_slice(&i.to_be_bytes());
                }
            }
        }
        Ok(())
    }

    #[inline(never)]
    fn write_list(&mut self, list: &TagList) -> Result<()> {
        if list.kind() == TagType::End && !list.is_empty() {
            return Err(self.bad(String::from("List of End must be empty")));
        }
        self.buf.push(list.kind().into());
        self.encode_count(list.len())?;
        for item in list {
            debug_assert_eq!(item.tag_type(), list.kind());
            self.encode_payload(item)?;
        }
        Ok(())
    }

    #[inline(never)]
    fn write_compound(&mut self, compound: &Compound) -> Result<()> {
        for (name, item) in compound.iter() {
            self.encode_named(name, item)?;
        }
        self.buf.push(TagType::End.into());
        Ok(())
    }
}
