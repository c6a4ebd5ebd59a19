//! The per-tile `props` string: `"x,y|fx|fy|CATEGORY|shape|reserved"`.

use std::fmt;
use std::str::FromStr;

use macroquad::math::UVec2;

/// Number of `|`-separated fields in a props string.
pub const PROPS_FIELD_COUNT: usize = 6;

/// Placeholder for an absent category or reserved field.
pub const NONE_MARKER: &str = "-";

/// What kind of tile this is for the engine consuming the tileset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// `TERRAIN`
    Terrain,
    /// Any other tag, kept verbatim
    Other(String),
}

impl Category {
    /// The tag as written in the props string.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Terrain => "TERRAIN",
            Category::Other(tag) => tag,
        }
    }
}

/// Collision shape identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `0`: the whole cell is solid
    Full,
    /// `1`: the shape comes from the sprite at the anchor
    Custom,
    /// Any other identifier, kept as-is
    Other(u32),
}

impl Shape {
    /// Numeric identifier as written in the props string.
    pub fn id(self) -> u32 {
        match self {
            Shape::Full => 0,
            Shape::Custom => 1,
            Shape::Other(id) => id,
        }
    }
}

impl From<u32> for Shape {
    fn from(id: u32) -> Self {
        match id {
            0 => Shape::Full,
            1 => Shape::Custom,
            other => Shape::Other(other),
        }
    }
}

/// Decoded props string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileProps {
    /// Atlas cell of the sprite this tile is drawn from
    pub anchor: UVec2,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Mirror vertically
    pub flip_y: bool,
    /// `None` when written as `-`
    pub category: Option<Category>,
    /// Collision shape
    pub shape: Shape,
    /// `None` when written as `-`
    pub reserved: Option<String>,
}

/// Why a props string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePropsError {
    /// Not exactly six fields; carries the count found
    FieldCount(usize),
    /// Category or reserved field is empty
    EmptyField(&'static str),
    /// Anchor is not two canonical unsigned integers
    Anchor(String),
    /// A flag is neither `0` nor `1`
    Flag {
        /// `flip-x` or `flip-y`
        field: &'static str,
        /// Offending text
        value: String,
    },
    /// Shape is not a canonical unsigned integer
    Shape(String),
}

impl fmt::Display for ParsePropsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePropsError::FieldCount(n) => {
                write!(f, "expected {} '|'-separated fields, found {}", PROPS_FIELD_COUNT, n)
            }
            ParsePropsError::EmptyField(field) => write!(f, "{} field is empty", field),
            ParsePropsError::Anchor(v) => write!(f, "anchor '{}' is not 'x,y'", v),
            ParsePropsError::Flag { field, value } => {
                write!(f, "{} flag must be 0 or 1, found '{}'", field, value)
            }
            ParsePropsError::Shape(v) => write!(f, "shape '{}' is not an unsigned integer", v),
        }
    }
}

impl std::error::Error for ParsePropsError {}

/// Plain decimal with no sign, padding or leading zeros, so that
/// formatting the result gives back the same text.
pub(crate) fn parse_canonical_u32(value: &str) -> Option<u32> {
    let canonical = !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && (value == "0" || !value.starts_with('0'));
    if canonical {
        value.parse().ok()
    } else {
        None
    }
}

fn parse_flag(field: &'static str, value: &str) -> Result<bool, ParsePropsError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ParsePropsError::Flag {
            field,
            value: value.to_owned(),
        }),
    }
}

fn parse_anchor(value: &str) -> Result<UVec2, ParsePropsError> {
    let bad = || ParsePropsError::Anchor(value.to_owned());
    let (x, y) = value.split_once(',').ok_or_else(bad)?;
    Ok(UVec2::new(
        parse_canonical_u32(x).ok_or_else(bad)?,
        parse_canonical_u32(y).ok_or_else(bad)?,
    ))
}

fn optional(value: &str) -> Option<&str> {
    (value != NONE_MARKER).then_some(value)
}

impl TileProps {
    /// Decodes a props string. Numbers must be canonical (no sign, padding or
    /// leading zeros), so `to_string()` gives back `s` exactly.
    pub fn parse(s: &str) -> Result<Self, ParsePropsError> {
        let fields: Vec<&str> = s.split('|').collect();
        let [anchor, flip_x, flip_y, category, shape, reserved] = fields[..] else {
            return Err(ParsePropsError::FieldCount(fields.len()));
        };

        for (name, value) in [("category", category), ("reserved", reserved)] {
            if value.is_empty() {
                return Err(ParsePropsError::EmptyField(name));
            }
        }

        Ok(TileProps {
            anchor: parse_anchor(anchor)?,
            flip_x: parse_flag("flip-x", flip_x)?,
            flip_y: parse_flag("flip-y", flip_y)?,
            category: optional(category).map(|tag| match tag {
                "TERRAIN" => Category::Terrain,
                other => Category::Other(other.to_owned()),
            }),
            shape: parse_canonical_u32(shape)
                .map(Shape::from)
                .ok_or_else(|| ParsePropsError::Shape(shape.to_owned()))?,
            reserved: optional(reserved).map(str::to_owned),
        })
    }

    /// Category is `TERRAIN`.
    pub fn is_terrain(&self) -> bool {
        self.category == Some(Category::Terrain)
    }
}

impl FromStr for TileProps {
    type Err = ParsePropsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileProps::parse(s)
    }
}

impl fmt::Display for TileProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}|{}|{}|{}|{}|{}",
            self.anchor.x,
            self.anchor.y,
            u8::from(self.flip_x),
            u8::from(self.flip_y),
            self.category.as_ref().map_or(NONE_MARKER, Category::as_str),
            self.shape.id(),
            self.reserved.as_deref().unwrap_or(NONE_MARKER),
        )
    }
}
