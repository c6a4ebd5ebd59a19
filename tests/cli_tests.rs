// tests/cli_tests.rs

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::Context;
use tiled_tileset::Tileset;

fn asset() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/tileset1616.tsx")
}

fn inspect(args: &[&str]) -> anyhow::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_tileset-inspect"))
        .args(args)
        .output()
        .context("running tileset-inspect")
}

#[test]
fn prints_tileset_summary() -> anyhow::Result<()> {
    let asset = asset();
    let out = inspect(&[asset.to_str().context("utf-8 path")?])?;
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("tileset 'TestTileSet'"), "{stdout}");
    assert!(stdout.contains("40 (10 columns x 4 rows of 16x16)"), "{stdout}");
    assert!(stdout.contains("animated: 30 'tileTemplate'"), "{stdout}");
    Ok(())
}

#[test]
fn shows_one_tile_by_name_or_id() -> anyhow::Result<()> {
    let asset = asset();
    let asset = asset.to_str().context("utf-8 path")?;

    let by_name = inspect(&[asset, "--tile", "tileTemplate"])?;
    assert!(by_name.status.success());
    let by_name = String::from_utf8(by_name.stdout)?;
    assert!(by_name.contains("tile 30 'tileTemplate'"), "{by_name}");
    assert!(by_name.contains("animation:   4 frames, 4000 ms"), "{by_name}");

    let by_id = String::from_utf8(inspect(&[asset, "--tile", "30"])?.stdout)?;
    assert!(by_id.contains("tile 30 'tileTemplate'"), "{by_id}");
    Ok(())
}

#[test]
fn exports_json_that_loads_back() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let json = dir.path().join("out.json");
    let asset = asset();

    let out = inspect(&[
        asset.to_str().context("utf-8 path")?,
        "--export-json",
        json.to_str().context("utf-8 path")?,
    ])?;
    assert!(out.status.success());

    let loaded = Tileset::load(&json)?;
    assert_eq!(loaded.name, "TestTileSet");
    assert_eq!(loaded.tile_count, 40);
    Ok(())
}

#[test]
fn failures_exit_non_zero() -> anyhow::Result<()> {
    let missing = inspect(&["no/such/tileset.tsx"])?;
    assert!(!missing.status.success());
    let stderr = String::from_utf8(missing.stderr)?;
    assert!(stderr.contains("Loading tileset"), "{stderr}");

    let asset = asset();
    let unknown = inspect(&[asset.to_str().context("utf-8 path")?, "--tile", "nope"])?;
    assert!(!unknown.status.success());
    Ok(())
}
