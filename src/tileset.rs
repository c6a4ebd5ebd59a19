//! The typed tileset and its validation.

use crate::animation::Animation;
use crate::error::TilesetError;
use crate::ir_tileset::{IrExport, IrImage, IrTile, IrTileset};
use crate::loader::{json_loader, tsx_loader};
use crate::properties::{Properties, PropertyValue};
use crate::props::TileProps;
use macroquad::math::{Rect, UVec2};
use std::collections::HashMap;
use std::path::Path;

/// Tile property holding the symbolic name.
pub const NAME_KEY: &str = "name";
/// Tile property holding the encoded [`TileProps`].
pub const PROPS_KEY: &str = "props";
/// Tile property holding the encoded [`Animation`] (may be empty).
pub const ANIMATION_KEY: &str = "animation";

/// Tileset property naming the runtime atlas image.
pub const ATLAS_FILE_KEY: &str = "atlas_file";
/// Tileset property naming the runtime atlas.
pub const ATLAS_NAME_KEY: &str = "atlas_name";

/// Knobs for the tileset-wide consistency checks. Per-tile checks always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Require `tilecount == columns * rows`, rows derived from the image height.
    pub check_grid: bool,
    /// Require every tile name to be distinct.
    pub unique_names: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            check_grid: true,
            unique_names: true,
        }
    }
}

impl LoadOptions {
    /// Sets [`LoadOptions::check_grid`].
    pub fn check_grid(mut self, yes: bool) -> Self {
        self.check_grid = yes;
        self
    }

    /// Sets [`LoadOptions::unique_names`].
    pub fn unique_names(mut self, yes: bool) -> Self {
        self.unique_names = yes;
        self
    }
}

/// The bitmap the tileset cuts its tiles from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetImage {
    /// Relative to the tileset file
    pub source: String,
    /// Pixels
    pub width: u32,
    /// Pixels
    pub height: u32,
}

/// Where the editor exports this tileset to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    /// Output file, relative to the tileset
    pub target: String,
    /// Tiled format name, e.g. `json`
    pub format: String,
}

/// One described tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Index inside the tileset, starting at 0
    pub id: u32,
    /// Unique symbolic name (unless [`LoadOptions::unique_names`] is off)
    pub name: String,
    /// `None` for static tiles
    pub animation: Option<Animation>,
    /// Decoded `props` string
    pub props: TileProps,
    /// Anything besides `name`, `props` and `animation`
    pub properties: Properties,
}

impl Tile {
    /// Has at least one animation frame.
    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }
}

/// A loaded and validated tileset.
#[derive(Debug, Clone)]
pub struct Tileset {
    /// Tileset name (may be empty)
    pub name: String,
    /// TSX format version
    pub version: Option<String>,
    /// Version of the editor that wrote the file
    pub tiled_version: Option<String>,
    /// Pixels
    pub tile_width: u32,
    /// Pixels
    pub tile_height: u32,
    /// Tiles in the image grid
    pub tile_count: u32,
    /// Tiles per row
    pub columns: u32,
    /// Pixels between tiles
    pub spacing: u32,
    /// Pixels around the grid
    pub margin: u32,
    /// Source bitmap
    pub image: TilesetImage,
    /// Editor export target, if any
    pub export: Option<ExportTarget>,
    /// Tileset-wide custom properties
    pub properties: Properties,
    tiles: Vec<Tile>, // index == id
    by_name: HashMap<String, u32>,
}

fn take_string(
    props: &mut Properties,
    tile: u32,
    key: &'static str,
) -> Result<Option<String>, TilesetError> {
    match props.remove(key) {
        None => Ok(None),
        Some(PropertyValue::String(s)) => Ok(Some(s)),
        Some(other) => Err(TilesetError::InvalidPropertyValue {
            name: format!("tile {tile} {key}"),
            value: format!("{other:?}"),
        }),
    }
}

fn tile_from_ir(ir: IrTile) -> Result<Tile, TilesetError> {
    let IrTile { id, mut properties } = ir;

    let name = take_string(&mut properties, id, NAME_KEY)?.ok_or(
        TilesetError::MissingTileProperty {
            tile: id,
            property: NAME_KEY,
        },
    )?;
    let props = take_string(&mut properties, id, PROPS_KEY)?.ok_or(
        TilesetError::MissingTileProperty {
            tile: id,
            property: PROPS_KEY,
        },
    )?;
    let props = TileProps::parse(&props).map_err(|e| TilesetError::InvalidProps {
        tile: id,
        reason: e.to_string(),
    })?;
    let animation = take_string(&mut properties, id, ANIMATION_KEY)?.unwrap_or_default();
    let animation = Animation::parse(&animation).map_err(|e| TilesetError::InvalidAnimation {
        tile: id,
        reason: e.to_string(),
    })?;

    Ok(Tile {
        id,
        name,
        animation,
        props,
        properties,
    })
}

/// Number of whole tiles that fit along `extent` pixels, `None` on overflow.
fn cells_along(extent: u32, tile: u32, margin: u32, spacing: u32) -> Option<u32> {
    let inner = extent.saturating_sub(margin.checked_mul(2)?);
    inner
        .checked_add(spacing)?
        .checked_div(tile.checked_add(spacing)?)
}

fn invalid_tileset_attr(attribute: &'static str, value: u32) -> TilesetError {
    TilesetError::InvalidAttribute {
        element: "tileset",
        attribute,
        value: value.to_string(),
    }
}

impl Tileset {
    /// Loads a `.tsx` or `.json` tileset with default [`LoadOptions`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TilesetError> {
        Self::load_with(path, &LoadOptions::default())
    }

    /// Loads by extension (`.tsx` or `.json`).
    pub fn load_with(path: impl AsRef<Path>, opts: &LoadOptions) -> Result<Self, TilesetError> {
        let p = path.as_ref();
        let ir = match p.extension().and_then(|e| e.to_str()) {
            Some("tsx") => tsx_loader::decode_tsx_file(p)?,
            Some("json") => json_loader::decode_json_file(p)?,
            _ => return Err(TilesetError::UnsupportedFormat(p.display().to_string())),
        };
        log::debug!("loading tileset from {}", p.display());
        Self::from_ir(ir, opts)
    }

    /// Parses `.tsx` text.
    pub fn from_tsx_str(src: &str, opts: &LoadOptions) -> Result<Self, TilesetError> {
        Self::from_ir(tsx_loader::decode_tsx_str(src)?, opts)
    }

    /// Parses Tiled JSON text.
    pub fn from_json_str(src: &str, opts: &LoadOptions) -> Result<Self, TilesetError> {
        Self::from_ir(json_loader::decode_json_str(src)?, opts)
    }

    /// Interprets and validates a decoded tileset.
    pub fn from_ir(ir: IrTileset, opts: &LoadOptions) -> Result<Self, TilesetError> {
        for (value, attribute) in [
            (ir.tile_w, "tilewidth"),
            (ir.tile_h, "tileheight"),
            (ir.columns, "columns"),
        ] {
            if value == 0 {
                return Err(TilesetError::ZeroDimension(attribute));
            }
        }

        let image = ir.image.ok_or(TilesetError::MissingElement {
            parent: "tileset",
            element: "image",
        })?;

        if ir.margin.checked_mul(2).is_none() {
            return Err(invalid_tileset_attr("margin", ir.margin));
        }
        let rows = cells_along(image.height, ir.tile_h, ir.margin, ir.spacing)
            .ok_or_else(|| invalid_tileset_attr("spacing", ir.spacing))?;
        let fit = cells_along(image.width, ir.tile_w, ir.margin, ir.spacing)
            .ok_or_else(|| invalid_tileset_attr("spacing", ir.spacing))?;

        if ir.columns.checked_mul(rows) != Some(ir.tilecount) {
            if opts.check_grid {
                return Err(TilesetError::TileCountMismatch {
                    declared: ir.tilecount,
                    columns: ir.columns,
                    rows,
                });
            }
            log::warn!(
                "tileset '{}': tilecount {} != {} columns x {} rows",
                ir.name,
                ir.tilecount,
                ir.columns,
                rows
            );
        }
        if fit != ir.columns {
            log::warn!(
                "tileset '{}': image fits {} columns but {} are declared",
                ir.name,
                fit,
                ir.columns
            );
        }

        let mut tiles = Vec::with_capacity(ir.tiles.len());
        let mut by_name = HashMap::with_capacity(ir.tiles.len());
        for (expected, raw) in (0u32..).zip(ir.tiles) {
            if raw.id != expected {
                return Err(TilesetError::NonContiguousTileId {
                    expected,
                    found: raw.id,
                });
            }
            if raw.id >= ir.tilecount {
                return Err(TilesetError::TileIdOutOfRange {
                    id: raw.id,
                    tile_count: ir.tilecount,
                });
            }

            let tile = tile_from_ir(raw)?;
            log::trace!("tile {} '{}' props={}", tile.id, tile.name, tile.props);

            if let Some(&first) = by_name.get(&tile.name) {
                if opts.unique_names {
                    return Err(TilesetError::DuplicateTileName {
                        name: tile.name,
                        first,
                        second: tile.id,
                    });
                }
                log::warn!("tile name '{}' reused by tile {}", tile.name, tile.id);
            } else {
                by_name.insert(tile.name.clone(), tile.id);
            }
            tiles.push(tile);
        }

        log::debug!(
            "tileset '{}': {}x{} tiles, {} described, {} animated",
            ir.name,
            ir.columns,
            rows,
            tiles.len(),
            tiles.iter().filter(|t| t.is_animated()).count()
        );

        Ok(Self {
            name: ir.name,
            version: ir.version,
            tiled_version: ir.tiled_version,
            tile_width: ir.tile_w,
            tile_height: ir.tile_h,
            tile_count: ir.tilecount,
            columns: ir.columns,
            spacing: ir.spacing,
            margin: ir.margin,
            image: TilesetImage {
                source: image.source,
                width: image.width,
                height: image.height,
            },
            export: ir.export.map(|e| ExportTarget {
                target: e.target,
                format: e.format,
            }),
            properties: ir.properties,
            tiles,
            by_name,
        })
    }

    /// Back to the format-agnostic form; `name`/`props`/`animation` become string properties again.
    pub fn to_ir(&self) -> IrTileset {
        IrTileset {
            name: self.name.clone(),
            version: self.version.clone(),
            tiled_version: self.tiled_version.clone(),
            tile_w: self.tile_width,
            tile_h: self.tile_height,
            tilecount: self.tile_count,
            columns: self.columns,
            spacing: self.spacing,
            margin: self.margin,
            image: Some(IrImage {
                source: self.image.source.clone(),
                width: self.image.width,
                height: self.image.height,
            }),
            export: self.export.as_ref().map(|e| IrExport {
                target: e.target.clone(),
                format: e.format.clone(),
            }),
            properties: self.properties.clone(),
            tiles: self
                .tiles
                .iter()
                .map(|t| {
                    let mut properties = t.properties.clone();
                    let animation = t.animation.as_ref().map(ToString::to_string);
                    properties.insert(
                        ANIMATION_KEY,
                        PropertyValue::String(animation.unwrap_or_default()),
                    );
                    properties.insert(NAME_KEY, PropertyValue::String(t.name.clone()));
                    properties.insert(PROPS_KEY, PropertyValue::String(t.props.to_string()));
                    IrTile {
                        id: t.id,
                        properties,
                    }
                })
                .collect(),
        }
    }

    /// The tileset in the Tiled JSON format.
    pub fn to_json_string(&self) -> Result<String, TilesetError> {
        json_loader::encode_json(&self.to_ir())
    }

    /// Writes [`Tileset::to_json_string`] to `path`.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), TilesetError> {
        let p = path.as_ref();
        let txt = self.to_json_string()?;
        std::fs::write(p, txt).map_err(|source| TilesetError::Io {
            path: p.to_path_buf(),
            source,
        })
    }

    /// Described tiles, indexed by id.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile `id`, if described.
    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.get(id as usize)
    }

    /// Tile called `name` (the first one, if names were allowed to repeat).
    pub fn tile_by_name(&self, name: &str) -> Option<&Tile> {
        self.by_name.get(name).and_then(|&id| self.tile(id))
    }

    /// Tiles with an animation, in id order.
    pub fn animated_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_animated())
    }

    /// Rows of the grid, derived from the image height.
    pub fn rows(&self) -> u32 {
        // validated by `from_ir`
        cells_along(self.image.height, self.tile_height, self.margin, self.spacing)
            .unwrap_or_default()
    }

    /// Tile size in pixels.
    pub fn tile_size(&self) -> UVec2 {
        UVec2::new(self.tile_width, self.tile_height)
    }

    /// The `atlas_file` property.
    pub fn atlas_file(&self) -> Option<&str> {
        self.properties.get_string(ATLAS_FILE_KEY)
    }

    /// The `atlas_name` property.
    pub fn atlas_name(&self) -> Option<&str> {
        self.properties.get_string(ATLAS_NAME_KEY)
    }

    /// Pixel rect of tile `id` inside [`Tileset::image`].
    pub fn source_rect(&self, id: u32) -> Option<Rect> {
        if id >= self.tile_count {
            return None;
        }
        let col = id % self.columns;
        let row = id / self.columns;
        let sx = col
            .checked_mul(self.tile_width.checked_add(self.spacing)?)?
            .checked_add(self.margin)?;
        let sy = row
            .checked_mul(self.tile_height.checked_add(self.spacing)?)?
            .checked_add(self.margin)?;
        Some(Rect::new(
            sx as f32,
            sy as f32,
            self.tile_width as f32,
            self.tile_height as f32,
        ))
    }

    /// Pixel rect of an atlas cell (a props anchor or an animation frame cell),
    /// assuming the atlas uses this tileset's tile size with no margin or spacing.
    /// `None` when the pixel position does not fit in a `u32`.
    pub fn cell_rect(&self, cell: UVec2) -> Option<Rect> {
        Some(Rect::new(
            cell.x.checked_mul(self.tile_width)? as f32,
            cell.y.checked_mul(self.tile_height)? as f32,
            self.tile_width as f32,
            self.tile_height as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Category;

    fn tsx(tilecount: u32, image_h: u32, tiles: &str) -> String {
        format!(
            r#"<tileset name="T" tilewidth="16" tileheight="16" tilecount="{tilecount}" columns="2">
 <properties>
  <property name="atlas_file" value="resources/atlas.png"/>
 </properties>
 <image source="t.png" width="32" height="{image_h}"/>
{tiles}
</tileset>"#
        )
    }

    fn tile(id: u32, name: &str, props: &str, animation: &str) -> String {
        format!(
            r#"<tile id="{id}"><properties>
  <property name="animation" value="{animation}"/>
  <property name="name" value="{name}"/>
  <property name="props" value="{props}"/>
</properties></tile>"#
        )
    }

    fn two_tiles() -> String {
        [
            tile(0, "full", "0,0|0|0|TERRAIN|0|-", ""),
            tile(1, "anim", "1,0|0|0|-|0|-", "500,1,0,0,0|250,1,0,1,0"),
        ]
        .concat()
    }

    #[test]
    fn builds_typed_tiles() {
        let ts = Tileset::from_tsx_str(&tsx(2, 16, &two_tiles()), &LoadOptions::default())
            .expect("load");
        assert_eq!(ts.rows(), 1);
        assert_eq!(ts.atlas_file(), Some("resources/atlas.png"));
        assert_eq!(ts.atlas_name(), None);

        let full = ts.tile_by_name("full").expect("full");
        assert_eq!(full.props.category, Some(Category::Terrain));
        assert!(!full.is_animated());
        assert!(full.properties.is_empty());

        let anim = ts.tile(1).expect("tile 1");
        assert_eq!(anim.animation.as_ref().map(Animation::len), Some(2));
        assert_eq!(ts.animated_tiles().count(), 1);
        assert!(ts.tile(2).is_none());
    }

    #[test]
    fn source_rect_walks_the_grid() {
        let ts = Tileset::from_tsx_str(&tsx(4, 32, &two_tiles()), &LoadOptions::default())
            .expect("load");
        assert_eq!(ts.source_rect(3), Some(Rect::new(16.0, 16.0, 16.0, 16.0)));
        assert_eq!(ts.source_rect(4), None);
        assert_eq!(
            ts.cell_rect(UVec2::new(2, 1)),
            Some(Rect::new(32.0, 16.0, 16.0, 16.0))
        );
        assert_eq!(ts.cell_rect(UVec2::new(300_000_000, 0)), None);
    }

    #[test]
    fn margin_and_spacing_shift_source_rects() {
        let src = r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2" spacing="2" margin="1">
 <image source="t.png" width="36" height="36"/>
</tileset>"#;
        let ts = Tileset::from_tsx_str(src, &LoadOptions::default()).expect("load");
        assert_eq!(ts.rows(), 2);
        assert_eq!(ts.source_rect(3), Some(Rect::new(19.0, 19.0, 16.0, 16.0)));
    }

    #[test]
    fn huge_columns_is_a_mismatch_not_an_overflow() {
        let src = r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="4294967295">
 <image source="t.png" width="32" height="32"/>
</tileset>"#;
        assert!(matches!(
            Tileset::from_tsx_str(src, &LoadOptions::default()),
            Err(TilesetError::TileCountMismatch {
                declared: 4,
                columns: u32::MAX,
                rows: 2
            })
        ));

        let ts = Tileset::from_tsx_str(src, &LoadOptions::default().check_grid(false))
            .expect("relaxed");
        assert_eq!(ts.source_rect(3), Some(Rect::new(48.0, 0.0, 16.0, 16.0)));
    }

    #[test]
    fn huge_margin_or_spacing_is_an_invalid_attribute() {
        let margin = r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2" margin="4294967295">
 <image source="t.png" width="32" height="32"/>
</tileset>"#;
        assert!(matches!(
            Tileset::from_tsx_str(margin, &LoadOptions::default()),
            Err(TilesetError::InvalidAttribute { attribute: "margin", .. })
        ));

        let spacing = r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2" spacing="4294967295">
 <image source="t.png" width="32" height="32"/>
</tileset>"#;
        assert!(matches!(
            Tileset::from_tsx_str(spacing, &LoadOptions::default()),
            Err(TilesetError::InvalidAttribute { attribute: "spacing", .. })
        ));
    }

    #[test]
    fn non_canonical_props_fail_the_load() {
        let padded = tile(0, "a", "0,0|0|0|TERRAIN|01|-", "");
        assert!(matches!(
            Tileset::from_tsx_str(&tsx(2, 16, &padded), &LoadOptions::default()),
            Err(TilesetError::InvalidProps { tile: 0, .. })
        ));
        let padded = tile(0, "a", "0,0|0|0|TERRAIN|0|-", "1000, 1,0,0,0");
        assert!(matches!(
            Tileset::from_tsx_str(&tsx(2, 16, &padded), &LoadOptions::default()),
            Err(TilesetError::InvalidAnimation { tile: 0, .. })
        ));
    }

    #[test]
    fn tile_count_must_match_grid() {
        let src = tsx(3, 16, &two_tiles());
        let err = Tileset::from_tsx_str(&src, &LoadOptions::default()).expect_err("mismatch");
        assert!(matches!(
            err,
            TilesetError::TileCountMismatch {
                declared: 3,
                columns: 2,
                rows: 1
            }
        ));
        let relaxed = LoadOptions::default().check_grid(false);
        assert!(Tileset::from_tsx_str(&src, &relaxed).is_ok());
    }

    #[test]
    fn tile_ids_must_be_contiguous_and_in_range() {
        let gap = [
            tile(0, "a", "0,0|0|0|TERRAIN|0|-", ""),
            tile(2, "b", "0,0|0|0|TERRAIN|0|-", ""),
        ]
        .concat();
        assert!(matches!(
            Tileset::from_tsx_str(&tsx(4, 32, &gap), &LoadOptions::default()),
            Err(TilesetError::NonContiguousTileId {
                expected: 1,
                found: 2
            })
        ));

        let too_many = [
            two_tiles(),
            tile(2, "c", "0,0|0|0|TERRAIN|0|-", ""),
        ]
        .concat();
        assert!(matches!(
            Tileset::from_tsx_str(&tsx(2, 16, &too_many), &LoadOptions::default()),
            Err(TilesetError::TileIdOutOfRange { id: 2, tile_count: 2 })
        ));
    }

    #[test]
    fn duplicate_names_are_rejected_unless_relaxed() {
        let dup = [
            tile(0, "same", "0,0|0|0|TERRAIN|0|-", ""),
            tile(1, "same", "1,0|0|0|TERRAIN|0|-", ""),
        ]
        .concat();
        let src = tsx(2, 16, &dup);
        assert!(matches!(
            Tileset::from_tsx_str(&src, &LoadOptions::default()),
            Err(TilesetError::DuplicateTileName { first: 0, second: 1, .. })
        ));

        let ts = Tileset::from_tsx_str(&src, &LoadOptions::default().unique_names(false))
            .expect("relaxed");
        assert_eq!(ts.tile_by_name("same").map(|t| t.id), Some(0));
    }

    #[test]
    fn per_tile_errors_name_the_tile() {
        let bad_props = tile(0, "a", "0,0|0|0|TERRAIN|0", "");
        assert!(matches!(
            Tileset::from_tsx_str(&tsx(2, 16, &bad_props), &LoadOptions::default()),
            Err(TilesetError::InvalidProps { tile: 0, .. })
        ));

        let bad_anim = tile(0, "a", "0,0|0|0|TERRAIN|0|-", "0,1,0,0,0");
        assert!(matches!(
            Tileset::from_tsx_str(&tsx(2, 16, &bad_anim), &LoadOptions::default()),
            Err(TilesetError::InvalidAnimation { tile: 0, .. })
        ));

        let no_name = r#"<tile id="0"><properties>
  <property name="props" value="0,0|0|0|TERRAIN|0|-"/>
</properties></tile>"#;
        assert!(matches!(
            Tileset::from_tsx_str(&tsx(2, 16, no_name), &LoadOptions::default()),
            Err(TilesetError::MissingTileProperty { tile: 0, property: "name" })
        ));
    }

    #[test]
    fn missing_animation_key_means_static_tile() {
        let src = r#"<tile id="0"><properties>
  <property name="name" value="a"/>
  <property name="props" value="0,0|0|0|TERRAIN|0|-"/>
  <property name="solid" type="bool" value="true"/>
</properties></tile>"#;
        let ts = Tileset::from_tsx_str(&tsx(2, 16, src), &LoadOptions::default()).expect("load");
        let t = ts.tile(0).expect("tile 0");
        assert!(!t.is_animated());
        assert_eq!(t.properties.get_bool("solid"), Some(true));
    }

    #[test]
    fn zero_dimensions_and_missing_image_are_rejected() {
        let no_image = r#"<tileset tilewidth="16" tileheight="16" tilecount="0" columns="1"/>"#;
        assert!(matches!(
            Tileset::from_tsx_str(no_image, &LoadOptions::default()),
            Err(TilesetError::MissingElement { element: "image", .. })
        ));
        let zero_cols = r#"<tileset tilewidth="16" tileheight="16" tilecount="0" columns="0"/>"#;
        assert!(matches!(
            Tileset::from_tsx_str(zero_cols, &LoadOptions::default()),
            Err(TilesetError::ZeroDimension("columns"))
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected_before_reading() {
        match Tileset::load("foo.tmx") {
            Err(TilesetError::UnsupportedFormat(path)) => assert_eq!(path, "foo.tmx"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }
}
