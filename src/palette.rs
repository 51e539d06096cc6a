//! Expansion of base map colors into the full shaded palette.
//!
//! Every base color has four shades. A color index `i` picks base color `i / 4`, shade `i % 4`,
//! and each shade scales the base RGB channels by a fixed multiplier out of 255, truncating.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type Rgb = [u8; 3];

/// Per-shade channel multipliers, out of 255: dark edge, light edge, true color, deep shade.
pub const SHADE_MULTIPLIERS: [u32; 4] = [180, 220, 255, 135];

/// Number of shades each base color expands into.
pub const SHADES_PER_COLOR: usize = SHADE_MULTIPLIERS.len();

/// Whether a base color is the "no color" sentinel or a real hue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFamily {
    /// Nothing was ever drawn here. Rendered as its base RGB at every shade.
    None,
    /// An ordinary shaded color.
    Hue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseColor {
    pub id: u8,
    pub family: ColorFamily,
    pub rgb: Rgb,
}

impl BaseColor {
    pub const fn none(id: u8) -> Self {
        Self {
            id,
            family: ColorFamily::None,
            rgb: [0, 0, 0],
        }
    }

    pub const fn hue(id: u8, r: u8, g: u8, b: u8) -> Self {
        Self {
            id,
            family: ColorFamily::Hue,
            rgb: [r, g, b],
        }
    }

    /// Get one of this color's four shades, or `None` if `shade` is 4 or more.
    pub fn shade(&self, shade: usize) -> Option<Rgb> {
        let m = *SHADE_MULTIPLIERS.get(shade)?;
        Some(match self.family {
            ColorFamily::None => self.rgb,
            ColorFamily::Hue => self.rgb.map(|c| (c as u32 * m / 255) as u8),
        })
    }
}

/// A flat lookup table holding four shades per base color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Expand a table of base colors. The result holds exactly `4 * base.len()` entries, with
    /// shade `s` of base color `i` at `4 * i + s`.
    pub fn build(base: &[BaseColor]) -> Self {
        let colors = base
            .iter()
            .flat_map(|color| (0..SHADES_PER_COLOR).filter_map(move |s| color.shade(s)))
            .collect();
        Self { colors }
    }

    /// Look up the color for an index.
    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.colors.get(index as usize).copied()
    }

    /// Split an index into its base color and shade, if it's in range.
    pub fn resolve(&self, index: u8) -> Option<(usize, usize)> {
        let index = index as usize;
        (index < self.colors.len()).then(|| (index / SHADES_PER_COLOR, index % SHADES_PER_COLOR))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn base_count(&self) -> usize {
        self.colors.len() / SHADES_PER_COLOR
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.colors
    }
}

impl Default for Palette {
    /// The palette built from the standard base color table.
    fn default() -> Self {
        Self::build(&crate::base_colors::BASE_COLORS)
    }
}

/// Check a base color table: ids must count up from 0 in order, only id 0 may be the `None`
/// sentinel, and the table must fit into byte-sized indices.
pub fn validate_base_colors(base: &[BaseColor]) -> Result<()> {
    if base.is_empty() {
        return Err(Error::BadPalette(String::from("table is empty")));
    }
    let max = 256 / SHADES_PER_COLOR;
    if base.len() > max {
        return Err(Error::BadPalette(format!(
            "table holds {} colors, at most {} fit in byte indices",
            base.len(),
            max
        )));
    }
    for (i, color) in base.iter().enumerate() {
        if color.id as usize != i {
            return Err(Error::BadPalette(format!(
                "entry {} has id {}, ids must count up from 0",
                i, color.id
            )));
        }
        let expected = if i == 0 {
            ColorFamily::None
        } else {
            ColorFamily::Hue
        };
        if color.family != expected {
            return Err(Error::BadPalette(format!(
                "entry {} has family {:?}, expected {:?}",
                i, color.family, expected
            )));
        }
    }
    Ok(())
}

/// Load a base color table from JSON: an array of `{"id", "family", "rgb"}` objects.
pub fn load_base_colors_json(json: &str) -> Result<Vec<BaseColor>> {
    let base: Vec<BaseColor> = serde_json::from_str(json)?;
    validate_base_colors(&base)?;
    Ok(base)
}
