//! Parse a directory of game data `.txt` files into a catalog JSON the optimizer can load
//! directly (set `OUTFITTER_CATALOG` to the output path).
//! Run: cargo run --bin normalize_game_data -- [data-dir] [catalog.json]

use std::path::PathBuf;

use outfitter::config::OutfitterConfig;
use outfitter::data::{load_game_data_dir, save_catalog_json};
use outfitter::logging::init_logging;

const DEFAULT_OUTPUT: &str = "catalog.json";

fn main() {
    let config = OutfitterConfig::from_env();
    init_logging(&config.log_level);

    let mut args = std::env::args().skip(1);
    let data_dir = args.next().map(PathBuf::from).unwrap_or(config.data_dir);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let catalog = match load_game_data_dir(&data_dir) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("failed to load game data: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = save_catalog_json(&catalog, &output) {
        eprintln!("failed to write catalog: {err}");
        std::process::exit(1);
    }
    println!(
        "Normalized {} outfits and {} ships into {}",
        catalog.len(),
        catalog.ships().len(),
        output.display()
    );
}
