use crate::tag_type::TagType;

/// A decoded tag payload. The `End` marker only frames compounds on the wire, so it never
/// appears as a value in a decoded tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(TagList),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Tag::Compound(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Tag::List(_))
    }

    pub fn is_byte_array(&self) -> bool {
        matches!(self, Tag::ByteArray(_))
    }

    pub fn as_byte(&self) -> Option<i8> {
        match *self {
            Tag::Byte(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match *self {
            Tag::Short(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Tag::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match *self {
            Tag::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Tag::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match *self {
            Tag::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Widen any integer tag to an i64.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Tag::Byte(v) => Some(v.into()),
            Tag::Short(v) => Some(v.into()),
            Tag::Int(v) => Some(v.into()),
            Tag::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            Tag::ByteArray(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Tag::IntArray(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Tag::LongArray(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&TagList> {
        match self {
            Tag::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Tag::Compound(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i8> for Tag {
    fn from(v: i8) -> Self {
        Tag::Byte(v)
    }
}

impl From<i16> for Tag {
    fn from(v: i16) -> Self {
        Tag::Short(v)
    }
}

impl From<i32> for Tag {
    fn from(v: i32) -> Self {
        Tag::Int(v)
    }
}

impl From<i64> for Tag {
    fn from(v: i64) -> Self {
        Tag::Long(v)
    }
}

impl From<f32> for Tag {
    fn from(v: f32) -> Self {
        Tag::Float(v)
    }
}

impl From<f64> for Tag {
    fn from(v: f64) -> Self {
        Tag::Double(v)
    }
}

impl From<&str> for Tag {
    fn from(v: &str) -> Self {
        Tag::String(v.to_owned())
    }
}

impl From<String> for Tag {
    fn from(v: String) -> Self {
        Tag::String(v)
    }
}

impl From<Vec<i8>> for Tag {
    fn from(v: Vec<i8>) -> Self {
        Tag::ByteArray(v)
    }
}

impl From<Vec<i32>> for Tag {
    fn from(v: Vec<i32>) -> Self {
        Tag::IntArray(v)
    }
}

impl From<Vec<i64>> for Tag {
    fn from(v: Vec<i64>) -> Self {
        Tag::LongArray(v)
    }
}

impl From<TagList> for Tag {
    fn from(v: TagList) -> Self {
        Tag::List(v)
    }
}

impl From<Compound> for Tag {
    fn from(v: Compound) -> Self {
        Tag::Compound(v)
    }
}

/// A homogeneous sequence of unnamed tags. Every item shares the declared element kind, and an
/// empty list still carries one (often `End`).
#[derive(Clone, Debug, PartialEq)]
pub struct TagList {
    kind: TagType,
    items: Vec<Tag>,
}

impl TagList {
    /// Create an empty list holding the given element kind.
    pub fn new(kind: TagType) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Build a list from a set of items, all of which must share `kind`. On failure, the items
    /// are handed back.
    pub fn from_items(kind: TagType, items: Vec<Tag>) -> Result<Self, Vec<Tag>> {
        if items.iter().all(|i| i.tag_type() == kind) {
            Ok(Self { kind, items })
        } else {
            Err(items)
        }
    }

    /// Items are assumed to have already been checked against `kind`.
    pub(crate) fn from_parts(kind: TagType, items: Vec<Tag>) -> Self {
        debug_assert!(items.iter().all(|i| i.tag_type() == kind));
        Self { kind, items }
    }

    /// Append an item, handing it back if it doesn't match the list's element kind.
    pub fn push(&mut self, item: Tag) -> Result<(), Tag> {
        if item.tag_type() != self.kind {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    pub fn kind(&self) -> TagType {
        self.kind
    }

    pub fn items(&self) -> &[Tag] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Tag> {
        self.items
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A mapping from unique names to tags.
///
/// Lookups don't depend on field order, but the order fields were inserted (or decoded) in is
/// kept, so that re-encoding a decoded compound reproduces the original bytes.
#[derive(Clone, Debug, Default)]
pub struct Compound {
    fields: Vec<(String, Tag)>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value if the name was already present. A replaced
    /// field keeps its original position.
    pub fn insert<S: Into<String>, T: Into<Tag>>(&mut self, name: S, tag: T) -> Option<Tag> {
        let name = name.into();
        let tag = tag.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, tag)),
            None => {
                self.fields.push((name, tag));
                None
            }
        }
    }

    /// Builder-style insert, mostly for constructing trees by hand.
    pub fn with<S: Into<String>, T: Into<Tag>>(mut self, name: S, tag: T) -> Self {
        self.insert(name, tag);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let pos = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(pos).1)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.fields.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

// Field order is a framing detail, not part of the value.
impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .fields
                .iter()
                .all(|(n, t)| other.get(n).map_or(false, |o| o == t))
    }
}

/// A tag paired with its name. A decoded document's root is always a named compound.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedTag {
    pub name: String,
    pub tag: Tag,
}

impl NamedTag {
    pub fn new<S: Into<String>, T: Into<Tag>>(name: S, tag: T) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
        }
    }

    /// Get the root compound, if this tag is one.
    pub fn root(&self) -> Option<&Compound> {
        self.tag.as_compound()
    }
}
