use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tiled_tileset::{LoadOptions, Tile, Tileset};

/// Load a Tiled tileset, validate it and print what it contains.
#[derive(Parser, Debug)]
#[command(name = "tileset-inspect", version, about)]
struct Cli {
    /// Tileset file (.tsx or .json)
    path: PathBuf,

    /// Show one tile, by id or by name
    #[arg(long)]
    tile: Option<String>,

    /// Write the tileset as Tiled JSON to this path
    #[arg(long, value_name = "OUT")]
    export_json: Option<PathBuf>,

    /// Skip the tilecount == columns x rows check
    #[arg(long)]
    no_grid_check: bool,

    /// Allow several tiles to share a name
    #[arg(long)]
    allow_duplicate_names: bool,
}

fn print_tile(ts: &Tileset, tile: &Tile) {
    println!("tile {} '{}'", tile.id, tile.name);
    if let Some(rect) = ts.source_rect(tile.id) {
        println!("  source rect: {},{} {}x{}", rect.x, rect.y, rect.w, rect.h);
    }
    println!("  props:       {}", tile.props);
    println!("  anchor:      {}", tile.props.anchor);
    println!("  flip:        x={} y={}", tile.props.flip_x, tile.props.flip_y);
    println!(
        "  category:    {}",
        tile.props.category.as_ref().map_or("-", |c| c.as_str())
    );
    println!("  shape:       {:?}", tile.props.shape);
    if let Some(anim) = &tile.animation {
        println!("  animation:   {} frames, {} ms", anim.len(), anim.total_duration_ms());
        for frame in anim.frames() {
            let cell = frame
                .cell()
                .map_or_else(|| "out of range".to_owned(), |c| c.to_string());
            println!("    {:>6} ms  cell {}", frame.duration_ms, cell);
        }
    }
    for (name, value) in tile.properties.iter() {
        println!("  {name} = {value:?}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let opts = LoadOptions::default()
        .check_grid(!cli.no_grid_check)
        .unique_names(!cli.allow_duplicate_names);
    let ts = Tileset::load_with(&cli.path, &opts)
        .with_context(|| format!("Loading tileset {}", cli.path.display()))?;

    println!("tileset '{}'", ts.name);
    println!(
        "  tiles:  {} ({} columns x {} rows of {}x{})",
        ts.tile_count,
        ts.columns,
        ts.rows(),
        ts.tile_width,
        ts.tile_height
    );
    println!(
        "  image:  {} ({}x{})",
        ts.image.source, ts.image.width, ts.image.height
    );
    if let Some(export) = &ts.export {
        println!("  export: {} ({})", export.target, export.format);
    }
    for (name, value) in ts.properties.iter() {
        println!("  {name} = {value:?}");
    }
    println!("  described tiles: {}", ts.tiles().len());
    for tile in ts.animated_tiles() {
        println!("  animated: {} '{}'", tile.id, tile.name);
    }

    if let Some(query) = &cli.tile {
        let tile = query
            .parse::<u32>()
            .ok()
            .and_then(|id| ts.tile(id))
            .or_else(|| ts.tile_by_name(query))
            .with_context(|| format!("No tile with id or name '{}'", query))?;
        print_tile(&ts, tile);
    }

    if let Some(out) = &cli.export_json {
        ts.save_json(out)
            .with_context(|| format!("Writing {}", out.display()))?;
        log::info!("wrote {}", out.display());
    }

    Ok(())
}
