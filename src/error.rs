use std::path::PathBuf;
use std::{error, fmt, io};

/// Error type for tileset loading.
#[derive(Debug)]
pub enum TilesetError {
    /// File I/O error
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// Malformed XML in a `.tsx` document
    Xml {
        /// `None` when parsing text directly
        path: Option<PathBuf>,
        /// Parser error
        source: roxmltree::Error,
    },
    /// Malformed or unexpected JSON
    Json {
        /// `None` when parsing text directly
        path: Option<PathBuf>,
        /// Parser error
        source: serde_json::Error,
    },
    /// Unsupported file format (neither `.tsx` nor `.json`)
    UnsupportedFormat(String),
    /// The document root is not a `<tileset>` element
    UnexpectedRoot(String),
    /// A required child element is absent
    MissingElement {
        /// Enclosing element
        parent: &'static str,
        /// Missing child
        element: &'static str,
    },
    /// A required attribute is absent
    MissingAttribute {
        /// Element the attribute belongs on
        element: &'static str,
        /// Missing attribute
        attribute: &'static str,
    },
    /// An attribute is present but its value cannot be used
    InvalidAttribute {
        /// Owning element
        element: &'static str,
        /// Offending attribute
        attribute: &'static str,
        /// Its text
        value: String,
    },
    /// A property declares a type this loader does not understand
    UnsupportedPropertyType {
        /// Property name
        name: String,
        /// Declared type
        kind: String,
    },
    /// A property value does not match its declared type
    InvalidPropertyValue {
        /// Property name
        name: String,
        /// Raw value
        value: String,
    },
    /// Tile width, tile height and columns must be non-zero
    ZeroDimension(&'static str),
    /// `tilecount` disagrees with the grid derived from the image
    TileCountMismatch {
        /// `tilecount` attribute
        declared: u32,
        /// `columns` attribute
        columns: u32,
        /// Rows that fit in the image
        rows: u32,
    },
    /// Tile ids must run 0, 1, 2, ... in document order
    NonContiguousTileId {
        /// Id the next tile should have
        expected: u32,
        /// Id it has
        found: u32,
    },
    /// A tile id at or above `tilecount`
    TileIdOutOfRange {
        /// Offending id
        id: u32,
        /// `tilecount` attribute
        tile_count: u32,
    },
    /// A tile is missing one of its required properties
    MissingTileProperty {
        /// Tile id
        tile: u32,
        /// Missing property name
        property: &'static str,
    },
    /// A tile's props string could not be decoded
    InvalidProps {
        /// Tile id
        tile: u32,
        /// What was wrong
        reason: String,
    },
    /// A tile's animation descriptor could not be decoded
    InvalidAnimation {
        /// Tile id
        tile: u32,
        /// What was wrong
        reason: String,
    },
    /// Two tiles share a name
    DuplicateTileName {
        /// The shared name
        name: String,
        /// Id of the first tile using it
        first: u32,
        /// Id of the tile that reused it
        second: u32,
    },
}

impl fmt::Display for TilesetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilesetError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            TilesetError::Xml { path: Some(p), source } => {
                write!(f, "Failed to parse XML in {}: {}", p.display(), source)
            }
            TilesetError::Xml { path: None, source } => write!(f, "Failed to parse XML: {}", source),
            TilesetError::Json { path: Some(p), source } => {
                write!(f, "Failed to parse JSON in {}: {}", p.display(), source)
            }
            TilesetError::Json { path: None, source } => write!(f, "Failed to parse JSON: {}", source),
            TilesetError::UnsupportedFormat(ext) => write!(f, "Unsupported file format: {}", ext),
            TilesetError::UnexpectedRoot(tag) => {
                write!(f, "Expected <tileset> root element, found <{}>", tag)
            }
            TilesetError::MissingElement { parent, element } => {
                write!(f, "<{}> is missing required element <{}>", parent, element)
            }
            TilesetError::MissingAttribute { element, attribute } => {
                write!(f, "<{}> is missing required attribute '{}'", element, attribute)
            }
            TilesetError::InvalidAttribute {
                element,
                attribute,
                value,
            } => write!(f, "<{}> has invalid {}=\"{}\"", element, attribute, value),
            TilesetError::UnsupportedPropertyType { name, kind } => {
                write!(f, "Property '{}' has unsupported type '{}'", name, kind)
            }
            TilesetError::InvalidPropertyValue { name, value } => {
                write!(f, "Property '{}' has invalid value '{}'", name, value)
            }
            TilesetError::ZeroDimension(attribute) => write!(f, "{} must be non-zero", attribute),
            TilesetError::TileCountMismatch {
                declared,
                columns,
                rows,
            } => write!(
                f,
                "tilecount {} does not match {} columns x {} rows",
                declared, columns, rows
            ),
            TilesetError::NonContiguousTileId { expected, found } => {
                write!(f, "Expected tile id {}, found {}", expected, found)
            }
            TilesetError::TileIdOutOfRange { id, tile_count } => {
                write!(f, "Tile id {} is out of range (tilecount {})", id, tile_count)
            }
            TilesetError::MissingTileProperty { tile, property } => {
                write!(f, "Tile {} is missing property '{}'", tile, property)
            }
            TilesetError::InvalidProps { tile, reason } => {
                write!(f, "Tile {} has invalid props: {}", tile, reason)
            }
            TilesetError::InvalidAnimation { tile, reason } => {
                write!(f, "Tile {} has invalid animation: {}", tile, reason)
            }
            TilesetError::DuplicateTileName { name, first, second } => write!(
                f,
                "Tile name '{}' is used by both tile {} and tile {}",
                name, first, second
            ),
        }
    }
}

impl error::Error for TilesetError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            TilesetError::Io { source, .. } => Some(source),
            TilesetError::Xml { source, .. } => Some(source),
            TilesetError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<roxmltree::Error> for TilesetError {
    fn from(source: roxmltree::Error) -> Self {
        TilesetError::Xml { path: None, source }
    }
}

impl From<serde_json::Error> for TilesetError {
    fn from(source: serde_json::Error) -> Self {
        TilesetError::Json { path: None, source }
    }
}
