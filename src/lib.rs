//! Typed loader for Tiled tilesets (`.tsx` and the Tiled JSON export).
//!
//! Besides the usual geometry, every tile carries three string properties that
//! this crate decodes: `name`, `props` (see [`TileProps`]) and `animation`
//! (see [`Animation`]).
//!
//! ```no_run
//! use tiled_tileset::Tileset;
//!
//! let ts = Tileset::load("assets/tileset1616.tsx")?;
//! let spike = ts.tile_by_name("spike_up").expect("tile exists");
//! println!("{} anchored at {}", spike.name, spike.props.anchor);
//! # Ok::<(), tiled_tileset::TilesetError>(())
//! ```

#![warn(missing_docs)]

pub mod animation;
mod error;
pub mod ir_tileset;
/// Format decoders producing [`IrTileset`].
pub mod loader {
    pub mod json_loader;
    pub mod tsx_loader;
}
mod properties;
pub mod props;
mod tileset;

pub use animation::{Animation, Frame};
pub use error::TilesetError;
pub use ir_tileset::IrTileset;
pub use properties::{Properties, PropertyValue};
pub use props::{Category, Shape, TileProps};
pub use tileset::{
    ExportTarget, LoadOptions, Tile, Tileset, TilesetImage, ANIMATION_KEY, ATLAS_FILE_KEY,
    ATLAS_NAME_KEY, NAME_KEY, PROPS_KEY,
};
