// tests/roundtrip_tests.rs

use std::fs;
use std::path::PathBuf;
use tiled_tileset::{LoadOptions, Tileset, TilesetError};

fn asset_text() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/tileset1616.tsx");
    fs::read_to_string(path).expect("bundled tileset")
}

/// `(name, props)` pairs exactly as written in the `.tsx` file.
fn raw_pairs(src: &str) -> Vec<(String, String)> {
    let doc = roxmltree::Document::parse(src).expect("xml");
    doc.descendants()
        .filter(|n| n.has_tag_name("tile"))
        .map(|tile| {
            let value = |key: &str| {
                tile.descendants()
                    .find(|p| p.has_tag_name("property") && p.attribute("name") == Some(key))
                    .and_then(|p| p.attribute("value"))
                    .expect("property present")
                    .to_owned()
            };
            (value("name"), value("props"))
        })
        .collect()
}

fn pairs(ts: &Tileset) -> Vec<(String, String)> {
    ts.tiles()
        .iter()
        .map(|t| (t.name.clone(), t.props.to_string()))
        .collect()
}

#[test]
fn names_and_props_survive_tsx_to_json_and_back() {
    let src = asset_text();
    let expected = raw_pairs(&src);
    assert_eq!(expected.len(), 40);

    let ts = Tileset::from_tsx_str(&src, &LoadOptions::default()).expect("tsx");
    assert_eq!(pairs(&ts), expected);

    let json = ts.to_json_string().expect("encode");
    let back = Tileset::from_json_str(&json, &LoadOptions::default()).expect("json");
    assert_eq!(pairs(&back), expected);
    assert_eq!(back.tiles(), ts.tiles());
    assert_eq!(back.properties, ts.properties);
    assert_eq!(back.export, ts.export);
    assert_eq!(back.image, ts.image);
}

#[test]
fn animation_string_survives_round_trip() {
    let ts = Tileset::from_tsx_str(&asset_text(), &LoadOptions::default()).expect("tsx");
    let ir = ts.to_ir();
    assert_eq!(
        ir.tiles[30].properties.get_string("animation"),
        Some("1000,1,0,0,0|1000,1,0,1,0|1000,1,0,1,1|1000,1,0,0,1")
    );
    assert_eq!(ir.tiles[0].properties.get_string("animation"), Some(""));
}

#[test]
fn save_json_then_load_by_extension() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("tileset1616.json");

    let ts = Tileset::from_tsx_str(&asset_text(), &LoadOptions::default())?;
    ts.save_json(&out)?;

    let loaded = Tileset::load(&out)?;
    assert_eq!(loaded.name, ts.name);
    assert_eq!(loaded.tile_count, 40);
    assert_eq!(pairs(&loaded), pairs(&ts));
    Ok(())
}

#[test]
fn corrupted_props_in_json_fail_the_load() {
    let ts = Tileset::from_tsx_str(&asset_text(), &LoadOptions::default()).expect("tsx");
    let json = ts
        .to_json_string()
        .expect("encode")
        .replace("0,0|0|0|TERRAIN|0|-", "0,0|0|0|TERRAIN|0");
    assert!(matches!(
        Tileset::from_json_str(&json, &LoadOptions::default()),
        Err(TilesetError::InvalidProps { tile: 0, .. })
    ));
}

#[test]
fn zero_padded_props_in_json_fail_the_load() -> anyhow::Result<()> {
    let ts = Tileset::from_tsx_str(&asset_text(), &LoadOptions::default())?;
    let json = ts
        .to_json_string()?
        .replace("0,0|0|0|TERRAIN|0|-", "0,0|0|0|TERRAIN|00|-");
    assert!(matches!(
        Tileset::from_json_str(&json, &LoadOptions::default()),
        Err(TilesetError::InvalidProps { tile: 0, .. })
    ));
    Ok(())
}
