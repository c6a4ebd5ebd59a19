//! Tiled custom properties.

use std::collections::BTreeMap;

use crate::error::TilesetError;

/// A single Tiled custom property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `bool`
    Bool(bool),
    /// `int`
    I64(i64),
    /// `float`
    F64(f64),
    /// `string`
    String(String),
    /// `file`: a path relative to the tileset
    File(String),
    /// `color`: `#AARRGGBB` or `#RRGGBB`, empty for "unset"
    Color(String),
    /// `object`: an object id, 0 for "none"
    Object(i64),
}

impl PropertyValue {
    /// Decodes a textual value (as found in `.tsx` attributes) using the Tiled type name.
    /// A missing type means `string`.
    pub fn from_tiled(name: &str, kind: Option<&str>, raw: &str) -> Result<Self, TilesetError> {
        let invalid = || TilesetError::InvalidPropertyValue {
            name: name.to_owned(),
            value: raw.to_owned(),
        };
        match kind {
            Some("bool") => match raw {
                "true" => Ok(PropertyValue::Bool(true)),
                "false" => Ok(PropertyValue::Bool(false)),
                _ => Err(invalid()),
            },
            Some("int") => raw.parse().map(PropertyValue::I64).map_err(|_| invalid()),
            Some("object") => raw.parse().map(PropertyValue::Object).map_err(|_| invalid()),
            Some("float") => raw.parse().map(PropertyValue::F64).map_err(|_| invalid()),
            None | Some("string") => Ok(PropertyValue::String(raw.to_owned())),
            Some("file") => Ok(PropertyValue::File(raw.to_owned())),
            Some("color") => Ok(PropertyValue::Color(raw.to_owned())),
            Some(other) => Err(TilesetError::UnsupportedPropertyType {
                name: name.to_owned(),
                kind: other.to_owned(),
            }),
        }
    }

    /// Tiled type name used when writing the value back out.
    pub fn tiled_type(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::I64(_) => "int",
            PropertyValue::F64(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::File(_) => "file",
            PropertyValue::Color(_) => "color",
            PropertyValue::Object(_) => "object",
        }
    }
}

/// Name-ordered set of custom properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: BTreeMap<String, PropertyValue>,
}

impl Properties {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.values.insert(name.into(), value)
    }

    /// Removes and returns `name`.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.values.remove(name)
    }

    /// The raw value of `name`, whatever its type.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// `Some` only for `bool` properties.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// `Some` for `int` and `object` properties.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::I64(v) | PropertyValue::Object(v) => Some(*v),
            _ => None,
        }
    }

    /// `None` when the stored integer does not fit in an `i32`.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get_i64(name).and_then(|v| i32::try_from(v).ok())
    }

    /// `Some` only for `float` properties.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            PropertyValue::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// [`Properties::get_f64`] narrowed to `f32`.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get_f64(name).map(|v| v as f32)
    }

    /// `Some` for `string`, `file` and `color` properties.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::String(v) | PropertyValue::File(v) | PropertyValue::Color(v) => {
                Some(v.as_str())
            }
            _ => None,
        }
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when there are no properties.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
