use crate::{
    error::{Error, Result},
    tag::{Compound, NamedTag, Tag},
    tag_type::TagType,
};

/// Field path from the document root to the map's color indices.
pub const COLORS_PATH: [&str; 2] = ["data", "colors"];

/// Walk down a chain of compounds by field name. Every step but the last must name a Compound.
pub fn lookup<'a>(root: &'a Compound, path: &[&str]) -> Result<&'a Tag> {
    let Some((last, parents)) = path.split_last() else {
        return Err(Error::MissingField(String::new()));
    };
    let mut current = root;
    for name in parents {
        current = expect_compound(current, name)?;
    }
    field(current, last)
}

/// Get a field, failing with its name if it isn't there.
pub fn field<'a>(compound: &'a Compound, name: &str) -> Result<&'a Tag> {
    compound
        .get(name)
        .ok_or_else(|| Error::MissingField(name.to_owned()))
}

/// Get a field that must hold a Compound.
pub fn expect_compound<'a>(compound: &'a Compound, name: &str) -> Result<&'a Compound> {
    let tag = field(compound, name)?;
    tag.as_compound()
        .ok_or_else(|| unexpected(name, TagType::Compound, tag))
}

/// Get a field that must hold a ByteArray.
pub fn expect_byte_array<'a>(compound: &'a Compound, name: &str) -> Result<&'a [i8]> {
    let tag = field(compound, name)?;
    tag.as_byte_array()
        .ok_or_else(|| unexpected(name, TagType::ByteArray, tag))
}

fn unexpected(name: &str, expected: TagType, actual: &Tag) -> Error {
    Error::UnexpectedType {
        field: name.to_owned(),
        expected,
        actual: actual.tag_type(),
    }
}

/// Find a map document's color indices, at `data` → `colors`. The bytes are stored signed;
/// reinterpret each one as `u8` to get a palette index.
pub fn find_colors(root: &NamedTag) -> Result<&[i8]> {
    let Some(compound) = root.root() else {
        return Err(Error::UnexpectedType {
            field: root.name.clone(),
            expected: TagType::Compound,
            actual: root.tag.tag_type(),
        });
    };
    let [data, colors] = COLORS_PATH;
    let data = expect_compound(compound, data)?;
    expect_byte_array(data, colors)
}
