//! Intermediate form shared by the `.tsx` and JSON decoders.

use crate::properties::Properties;

/// Canonical, format-agnostic tileset as produced by the decoders.
/// Nothing here is validated beyond "the document had the right shape".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IrTileset {
    /// Empty when absent
    pub name: String,
    /// `version` attribute
    pub version: Option<String>,
    /// `tiledversion` attribute
    pub tiled_version: Option<String>,
    /// Tile width in pixels
    pub tile_w: u32,
    /// Tile height in pixels
    pub tile_h: u32,
    /// Declared tile count
    pub tilecount: u32,
    /// Declared columns
    pub columns: u32,
    /// 0 if not used
    pub spacing: u32,
    /// 0 if not used
    pub margin: u32,
    /// `<image>` child
    pub image: Option<IrImage>,
    /// Editor export settings
    pub export: Option<IrExport>,
    /// Tileset-wide properties
    pub properties: Properties,
    /// Document order
    pub tiles: Vec<IrTile>,
}

/// `<image source width height/>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrImage {
    #[allow(missing_docs)]
    pub source: String,
    #[allow(missing_docs)]
    pub width: u32,
    #[allow(missing_docs)]
    pub height: u32,
}

/// `<editorsettings><export .../></editorsettings>`
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct IrExport {
    pub target: String,
    pub format: String,
}

/// One `<tile>` element, properties not yet interpreted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IrTile {
    /// `id` attribute
    pub id: u32,
    /// Including `name`, `props` and `animation`
    pub properties: Properties,
}
