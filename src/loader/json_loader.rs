//! Tiled JSON tilesets: decoding into [`IrTileset`] and encoding back out.
use crate::error::TilesetError;
use crate::ir_tileset::*;
use crate::properties::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::Path;

/// Tiled JSON tileset, as written by "Export As... JSON".
#[derive(Deserialize, Serialize)]
struct JsonTileset {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tiledversion: Option<String>,
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    columns: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    imagewidth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    imageheight: Option<u32>,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    editorsettings: Option<JsonEditorSettings>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<JsonProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tiles: Vec<JsonTile>,
    #[serde(rename = "type", default = "tileset_kind")]
    kind: String,
}

fn tileset_kind() -> String {
    "tileset".to_owned()
}

#[derive(Deserialize, Serialize)]
struct JsonEditorSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    export: Option<JsonExport>,
}

#[derive(Deserialize, Serialize)]
struct JsonExport {
    target: String,
    format: String,
}

#[derive(Deserialize, Serialize)]
struct JsonProperty {
    name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    value: JsonValue,
}

#[derive(Deserialize, Serialize)]
struct JsonTile {
    id: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<JsonProperty>,
}

fn json_property_to_ir(prop: JsonProperty) -> Result<(String, PropertyValue), TilesetError> {
    let JsonProperty { name, kind, value } = prop;

    let parsed = match kind.as_deref() {
        Some("bool") => value.as_bool().map(PropertyValue::Bool),
        Some("int") => value.as_i64().map(PropertyValue::I64),
        Some("object") => value.as_i64().map(PropertyValue::Object),
        Some("float") => value.as_f64().map(PropertyValue::F64),
        Some("string") => value.as_str().map(|s| PropertyValue::String(s.to_owned())),
        Some("file") => value.as_str().map(|s| PropertyValue::File(s.to_owned())),
        Some("color") => value.as_str().map(|s| PropertyValue::Color(s.to_owned())),
        Some(other) => {
            return Err(TilesetError::UnsupportedPropertyType {
                name,
                kind: other.to_owned(),
            });
        }
        None => {
            if let Some(v) = value.as_bool() {
                Some(PropertyValue::Bool(v))
            } else if let Some(v) = value.as_i64() {
                Some(PropertyValue::I64(v))
            } else if let Some(v) = value.as_f64() {
                Some(PropertyValue::F64(v))
            } else {
                value.as_str().map(|s| PropertyValue::String(s.to_owned()))
            }
        }
    };

    match parsed {
        Some(value) => Ok((name, value)),
        None => Err(TilesetError::InvalidPropertyValue {
            name,
            value: value.to_string(),
        }),
    }
}

fn properties_from_json(props: Vec<JsonProperty>) -> Result<Properties, TilesetError> {
    props.into_iter().map(json_property_to_ir).collect()
}

fn properties_to_json(props: &Properties) -> Vec<JsonProperty> {
    props
        .iter()
        .map(|(name, value)| JsonProperty {
            name: name.to_owned(),
            kind: Some(value.tiled_type().to_owned()),
            value: match value {
                PropertyValue::Bool(v) => JsonValue::from(*v),
                PropertyValue::I64(v) | PropertyValue::Object(v) => JsonValue::from(*v),
                PropertyValue::F64(v) => JsonValue::from(*v),
                PropertyValue::String(v) | PropertyValue::File(v) | PropertyValue::Color(v) => {
                    JsonValue::from(v.as_str())
                }
            },
        })
        .collect()
}

fn image_from_json(j: &JsonTileset) -> Result<Option<IrImage>, TilesetError> {
    let Some(source) = &j.image else {
        return Ok(None);
    };
    let width = j.imagewidth.ok_or(TilesetError::MissingAttribute {
        element: "tileset",
        attribute: "imagewidth",
    })?;
    let height = j.imageheight.ok_or(TilesetError::MissingAttribute {
        element: "tileset",
        attribute: "imageheight",
    })?;
    Ok(Some(IrImage {
        source: source.clone(),
        width,
        height,
    }))
}

/// Decodes the text of a Tiled JSON tileset.
pub fn decode_json_str(src: &str) -> Result<IrTileset, TilesetError> {
    let j: JsonTileset = serde_json::from_str(src)?;
    if j.kind != "tileset" {
        return Err(TilesetError::UnexpectedRoot(j.kind));
    }

    let image = image_from_json(&j)?;
    let export = j
        .editorsettings
        .and_then(|s| s.export)
        .map(|e| IrExport {
            target: e.target,
            format: e.format,
        });

    let tiles = j
        .tiles
        .into_iter()
        .map(|tile| -> Result<IrTile, TilesetError> {
            Ok(IrTile {
                id: tile.id,
                properties: properties_from_json(tile.properties)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IrTileset {
        name: j.name,
        version: j.version,
        tiled_version: j.tiledversion,
        tile_w: j.tilewidth,
        tile_h: j.tileheight,
        tilecount: j.tilecount,
        columns: j.columns,
        spacing: j.spacing,
        margin: j.margin,
        image,
        export,
        properties: properties_from_json(j.properties)?,
        tiles,
    })
}

/// Reads and decodes a Tiled JSON tileset file.
pub fn decode_json_file(path: &Path) -> Result<IrTileset, TilesetError> {
    let txt = std::fs::read_to_string(path).map_err(|source| TilesetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_json_str(&txt).map_err(|err| match err {
        TilesetError::Json { path: None, source } => TilesetError::Json {
            path: Some(path.to_path_buf()),
            source,
        },
        other => other,
    })
}

/// Encodes a tileset in the Tiled JSON format (pretty-printed).
pub fn encode_json(ts: &IrTileset) -> Result<String, TilesetError> {
    let j = JsonTileset {
        name: ts.name.clone(),
        version: ts.version.clone(),
        tiledversion: ts.tiled_version.clone(),
        tilewidth: ts.tile_w,
        tileheight: ts.tile_h,
        tilecount: ts.tilecount,
        columns: ts.columns,
        image: ts.image.as_ref().map(|i| i.source.clone()),
        imagewidth: ts.image.as_ref().map(|i| i.width),
        imageheight: ts.image.as_ref().map(|i| i.height),
        spacing: ts.spacing,
        margin: ts.margin,
        editorsettings: ts.export.as_ref().map(|e| JsonEditorSettings {
            export: Some(JsonExport {
                target: e.target.clone(),
                format: e.format.clone(),
            }),
        }),
        properties: properties_to_json(&ts.properties),
        tiles: ts
            .tiles
            .iter()
            .map(|t| JsonTile {
                id: t.id,
                properties: properties_to_json(&t.properties),
            })
            .collect(),
        kind: tileset_kind(),
    };
    Ok(serde_json::to_string_pretty(&j)?)
}
