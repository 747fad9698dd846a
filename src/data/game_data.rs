//! Parse outfit and ship definitions from game data text files.
//!
//! Files are blank-line separated blocks. A block whose header line starts with `outfit` or
//! `ship` becomes an item or a hull; every other block is ignored. Inside a block each line
//! is read as `<key> <value>`; nesting is flattened, so weapon sub-blocks contribute their
//! firing stats to the outfit. Energy, heat and cooling are per frame in the files and are
//! converted to per second here.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::data::catalog::Catalog;
use crate::data::item::{Item, ItemStats};
use crate::data::ship::Ship;
use crate::error::{OutfitterError, Result};

const FRAMES_PER_SECOND: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stat {
    Space,
    EnergyGeneration,
    EnergyUse,
    Heat,
    Cooling,
    Expansions,
    Mass,
    HeatDissipation,
    CargoSpace,
    Reload,
}

fn stat_for_key(key: &str) -> Option<Stat> {
    let stat = match key {
        "outfit space" => Stat::Space,
        "energy generation" => Stat::EnergyGeneration,
        "firing energy" | "thrusting energy" | "turning energy" | "shield energy" => {
            Stat::EnergyUse
        }
        "heat generation" | "thrusting heat" | "turning heat" | "firing heat" => Stat::Heat,
        "cooling" => Stat::Cooling,
        "cooling inefficiency" => Stat::Expansions,
        "mass" => Stat::Mass,
        "heat dissipation" => Stat::HeatDissipation,
        "cargo space" => Stat::CargoSpace,
        "reload" => Stat::Reload,
        _ => return None,
    };
    Some(stat)
}

/// Outfits and ships found in one or more data files, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameData {
    pub outfits: Vec<Item>,
    pub ships: Vec<Ship>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Outfit,
    Ship,
}

/// Split a line into tokens. Tokens wrapped in `"` or backticks keep inner spaces; a
/// backtick-quoted token may contain double quotes.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.trim().chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        if ch == '"' || ch == '`' {
            chars.next();
            for inner in chars.by_ref() {
                if inner == ch {
                    break;
                }
                token.push(inner);
            }
        } else {
            while let Some(&inner) = chars.peek() {
                if inner.is_whitespace() {
                    break;
                }
                token.push(inner);
                chars.next();
            }
        }
        tokens.push(token);
    }
    tokens
}

fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn block_header(line: &str) -> Option<(BlockKind, String)> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let tokens = tokenize(line);
    let kind = match tokens.first().map(String::as_str) {
        Some("outfit") => BlockKind::Outfit,
        Some("ship") => BlockKind::Ship,
        _ => return None,
    };
    // Variant hulls (`ship "Base" "Variant"`) are named by their last token.
    let name = tokens.last().filter(|_| tokens.len() > 1)?.clone();
    Some((kind, name))
}

fn parse_block_stats(name: &str, lines: &[&str]) -> ItemStats {
    let mut stats = ItemStats::default();
    let mut reload = 1.0;

    for line in lines {
        let tokens = tokenize(line);
        let [key, value] = tokens.as_slice() else {
            continue;
        };
        let Some(stat) = stat_for_key(key) else {
            continue;
        };
        let Ok(value) = value.parse::<f64>() else {
            warn!("{name}: skipping non-numeric '{key}' value '{value}'");
            continue;
        };
        match stat {
            Stat::Space => stats.space += value.round() as i32,
            Stat::EnergyGeneration => stats.energy_generation += value,
            Stat::EnergyUse => stats.energy_use += value,
            Stat::Heat => stats.heat += value,
            Stat::Cooling => stats.cooling += value,
            Stat::Expansions => stats.expansions += value.round() as i32,
            Stat::Mass => stats.mass += value,
            Stat::HeatDissipation => stats.heat_dissipation += value,
            Stat::CargoSpace => stats.cargo_space += value.round() as i32,
            Stat::Reload => reload = value,
        }
    }

    if reload <= 0.0 {
        warn!("{name}: reload {reload} is not positive, treating as 1");
        reload = 1.0;
    }
    let per_second = FRAMES_PER_SECOND / reload;
    stats.energy_generation *= per_second;
    stats.energy_use *= per_second;
    stats.heat *= per_second;
    stats.cooling *= per_second;
    stats.energy = stats.energy_generation - stats.energy_use;
    stats
}

/// Parse one data file. Outfits that take no space (and give none) are dropped.
pub fn parse_game_data(text: &str) -> GameData {
    let mut data = GameData::default();
    for block in blocks(text) {
        let Some((kind, name)) = block.first().and_then(|header| block_header(header)) else {
            continue;
        };
        let stats = parse_block_stats(&name, &block[1..]);
        match kind {
            BlockKind::Outfit if stats.space != 0 => data.outfits.push(Item::new(name, stats)),
            BlockKind::Outfit => debug!("{name}: no outfit space, not a catalog outfit"),
            BlockKind::Ship => data.ships.push(Ship::new(name, stats)),
        }
    }
    data
}

/// Read every `.txt` file in `dir`, in file name order, into one catalog.
pub fn load_game_data_dir(dir: &Path) -> Result<Catalog> {
    let read_err = |source| OutfitterError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut catalog = Catalog::new();
    for path in &paths {
        let text = fs::read_to_string(path).map_err(|source| OutfitterError::Read {
            path: path.clone(),
            source,
        })?;
        let data = parse_game_data(&text);
        debug!(
            outfits = data.outfits.len(),
            ships = data.ships.len(),
            "parsed {}",
            path.display()
        );
        for outfit in data.outfits {
            catalog.insert_outfit(outfit);
        }
        for ship in data.ships {
            catalog.insert_ship(ship);
        }
    }
    info!(
        files = paths.len(),
        outfits = catalog.len(),
        ships = catalog.ships().len(),
        "loaded game data from {}",
        dir.display()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_handles_both_quote_styles() {
        assert_eq!(tokenize("\t\"outfit space\" -12"), vec!["outfit space", "-12"]);
        assert_eq!(
            tokenize("outfit `\"Biroo\" Atomic Thruster`"),
            vec!["outfit", "\"Biroo\" Atomic Thruster"]
        );
        assert_eq!(tokenize("category Systems"), vec!["category", "Systems"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn indented_header_is_not_a_block() {
        assert_eq!(block_header("\toutfit \"X\""), None);
        assert_eq!(block_header("outfit"), None);
        assert_eq!(
            block_header("ship \"Aerie\" \"Aerie (Jump)\""),
            Some((BlockKind::Ship, "Aerie (Jump)".to_string()))
        );
    }

    #[test]
    fn reload_scales_firing_stats() {
        let text = concat!(
            "outfit \"Pulse Gun\"\n",
            "\t\"outfit space\" -6\n",
            "\tweapon\n",
            "\t\t\"firing energy\" 2\n",
            "\t\t\"firing heat\" 3\n",
            "\t\t\"reload\" 10\n",
        );
        let data = parse_game_data(text);
        let gun = &data.outfits[0].stats;
        assert_eq!(gun.space, -6);
        assert_eq!(gun.energy_use, 12.0);
        assert_eq!(gun.heat, 18.0);
        assert_eq!(gun.energy, -12.0);
    }
}
