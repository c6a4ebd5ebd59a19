//! `.tsx` (XML) tilesets, decoded with roxmltree into [`IrTileset`].
use crate::error::TilesetError;
use crate::ir_tileset::*;
use crate::properties::{Properties, PropertyValue};
use roxmltree::{Document, Node};
use std::path::Path;

fn required_u32(node: Node, element: &'static str, attribute: &'static str) -> Result<u32, TilesetError> {
    let value = node
        .attribute(attribute)
        .ok_or(TilesetError::MissingAttribute { element, attribute })?;
    parse_u32(value, element, attribute)
}

fn optional_u32(node: Node, element: &'static str, attribute: &'static str) -> Result<u32, TilesetError> {
    node.attribute(attribute)
        .map_or(Ok(0), |value| parse_u32(value, element, attribute))
}

fn parse_u32(value: &str, element: &'static str, attribute: &'static str) -> Result<u32, TilesetError> {
    value.trim().parse().map_err(|_| TilesetError::InvalidAttribute {
        element,
        attribute,
        value: value.to_owned(),
    })
}

fn properties_from_node(node: Node) -> Result<Properties, TilesetError> {
    let mut out = Properties::new();
    for prop in node.children().filter(|n| n.has_tag_name("property")) {
        let name = prop.attribute("name").ok_or(TilesetError::MissingAttribute {
            element: "property",
            attribute: "name",
        })?;
        // Multi-line strings are stored as element text instead of `value`.
        let raw = prop
            .attribute("value")
            .or_else(|| prop.text())
            .unwrap_or_default();
        let value = PropertyValue::from_tiled(name, prop.attribute("type"), raw)?;
        out.insert(name, value);
    }
    Ok(out)
}

fn image_from_node(node: Node) -> Result<IrImage, TilesetError> {
    let source = node.attribute("source").ok_or(TilesetError::MissingAttribute {
        element: "image",
        attribute: "source",
    })?;
    Ok(IrImage {
        source: source.to_owned(),
        width: required_u32(node, "image", "width")?,
        height: required_u32(node, "image", "height")?,
    })
}

fn export_from_node(node: Node) -> Option<IrExport> {
    let export = node.children().find(|n| n.has_tag_name("export"))?;
    Some(IrExport {
        target: export.attribute("target")?.to_owned(),
        format: export.attribute("format")?.to_owned(),
    })
}

fn tile_from_node(node: Node) -> Result<IrTile, TilesetError> {
    let mut tile = IrTile {
        id: required_u32(node, "tile", "id")?,
        properties: Properties::new(),
    };
    for child in node.children() {
        if child.has_tag_name("properties") {
            tile.properties = properties_from_node(child)?;
        }
    }
    Ok(tile)
}

/// Decodes the text of a `.tsx` document.
pub fn decode_tsx_str(src: &str) -> Result<IrTileset, TilesetError> {
    let doc = Document::parse(src)?;
    let root = doc.root_element();
    if !root.has_tag_name("tileset") {
        return Err(TilesetError::UnexpectedRoot(
            root.tag_name().name().to_owned(),
        ));
    }

    let mut ts = IrTileset {
        name: root.attribute("name").unwrap_or_default().to_owned(),
        version: root.attribute("version").map(str::to_owned),
        tiled_version: root.attribute("tiledversion").map(str::to_owned),
        tile_w: required_u32(root, "tileset", "tilewidth")?,
        tile_h: required_u32(root, "tileset", "tileheight")?,
        tilecount: required_u32(root, "tileset", "tilecount")?,
        columns: required_u32(root, "tileset", "columns")?,
        spacing: optional_u32(root, "tileset", "spacing")?,
        margin: optional_u32(root, "tileset", "margin")?,
        ..IrTileset::default()
    };

    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "editorsettings" => ts.export = export_from_node(child),
            "properties" => ts.properties = properties_from_node(child)?,
            "image" => ts.image = Some(image_from_node(child)?),
            "tile" => ts.tiles.push(tile_from_node(child)?),
            _ => {}
        }
    }

    log::trace!(
        "decoded tsx tileset '{}' with {} tile entries",
        ts.name,
        ts.tiles.len()
    );
    Ok(ts)
}

/// Reads and decodes a `.tsx` file.
pub fn decode_tsx_file(path: &Path) -> Result<IrTileset, TilesetError> {
    let txt = std::fs::read_to_string(path).map_err(|source| TilesetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_tsx_str(&txt).map_err(|err| match err {
        TilesetError::Xml { path: None, source } => TilesetError::Xml {
            path: Some(path.to_path_buf()),
            source,
        },
        other => other,
    })
}
