use std::convert::TryFrom;
use std::fmt;

/// Tag type ids, as they appear on the wire. This carries neither the name nor the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagType {
    End,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Compound,
    IntArray,
    LongArray,
}

impl TagType {
    /// Convert a TagType to its single-byte id.
    pub fn to_u8(self) -> u8 {
        match self {
            TagType::End => 0,
            TagType::Byte => 1,
            TagType::Short => 2,
            TagType::Int => 3,
            TagType::Long => 4,
            TagType::Float => 5,
            TagType::Double => 6,
            TagType::ByteArray => 7,
            TagType::String => 8,
            TagType::List => 9,
            TagType::Compound => 10,
            TagType::IntArray => 11,
            TagType::LongArray => 12,
        }
    }

    /// Try to read a byte as a TagType. Fails if it's not a recognized id.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(TagType::End),
            1 => Some(TagType::Byte),
            2 => Some(TagType::Short),
            3 => Some(TagType::Int),
            4 => Some(TagType::Long),
            5 => Some(TagType::Float),
            6 => Some(TagType::Double),
            7 => Some(TagType::ByteArray),
            8 => Some(TagType::String),
            9 => Some(TagType::List),
            10 => Some(TagType::Compound),
            11 => Some(TagType::IntArray),
            12 => Some(TagType::LongArray),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagType::End => "End",
            TagType::Byte => "Byte",
            TagType::Short => "Short",
            TagType::Int => "Int",
            TagType::Long => "Long",
            TagType::Float => "Float",
            TagType::Double => "Double",
            TagType::ByteArray => "ByteArray",
            TagType::String => "String",
            TagType::List => "List",
            TagType::Compound => "Compound",
            TagType::IntArray => "IntArray",
            TagType::LongArray => "LongArray",
        }
    }

    /// Size in bytes of a fixed-width payload, or of one element of an array payload.
    pub(crate) fn fixed_width(&self) -> Option<usize> {
        match self {
            TagType::Byte | TagType::ByteArray => Some(1),
            TagType::Short => Some(2),
            TagType::Int | TagType::Float | TagType::IntArray => Some(4),
            TagType::Long | TagType::Double | TagType::LongArray => Some(8),
            _ => None,
        }
    }

    /// Fewest bytes an unnamed payload of this type can take up on the wire.
    pub(crate) fn min_payload_width(&self) -> usize {
        match self {
            TagType::End => 0,
            TagType::Byte | TagType::Compound => 1,
            TagType::Short | TagType::String => 2,
            TagType::Int | TagType::Float => 4,
            TagType::ByteArray | TagType::IntArray | TagType::LongArray => 4,
            TagType::Long | TagType::Double => 8,
            TagType::List => 5,
        }
    }
}

impl From<TagType> for u8 {
    fn from(val: TagType) -> u8 {
        val.to_u8()
    }
}

impl TryFrom<u8> for TagType {
    type Error = u8;
    fn try_from(val: u8) -> Result<TagType, u8> {
        TagType::from_u8(val).ok_or(val)
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
