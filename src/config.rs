//! Runtime configuration: built-in defaults overridden by `OUTFITTER_*` environment variables.

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::optimizer::heat::DEFAULT_HEAT_STEP;

pub const DEFAULT_DATA_DIR: &str = "gameData";
pub const DEFAULT_DENYLIST_PATH: &str = "illegalOutfits.txt";
pub const DEFAULT_INPUT_DIR: &str = "inputs";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct OutfitterConfig {
    /// Directory of game data `.txt` files.
    pub data_dir: PathBuf,
    /// Pre-normalized catalog JSON. When set it replaces parsing `data_dir`.
    pub catalog_path: Option<PathBuf>,
    pub denylist_path: PathBuf,
    /// Relative input file names resolve against this directory.
    pub input_dir: PathBuf,
    /// Relative `--out` paths resolve against this directory.
    pub output_dir: PathBuf,
    pub heat_step: f64,
    /// Worker threads for parallel search. 0 = rayon default.
    pub workers: usize,
    pub log_level: String,
}

impl Default for OutfitterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_path: None,
            denylist_path: PathBuf::from(DEFAULT_DENYLIST_PATH),
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            heat_step: DEFAULT_HEAT_STEP,
            workers: 0,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl OutfitterConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so overrides can be tested without touching the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            data_dir: non_empty("OUTFITTER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            catalog_path: non_empty("OUTFITTER_CATALOG").map(PathBuf::from),
            denylist_path: non_empty("OUTFITTER_DENYLIST")
                .map(PathBuf::from)
                .unwrap_or(defaults.denylist_path),
            input_dir: non_empty("OUTFITTER_INPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_dir),
            output_dir: non_empty("OUTFITTER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            heat_step: parse_heat_step(non_empty("OUTFITTER_HEAT_STEP"), defaults.heat_step),
            workers: parse_workers(non_empty("OUTFITTER_WORKERS"), defaults.workers),
            log_level: non_empty("OUTFITTER_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Relative names that exist as given (e.g. from the working directory) are used as-is;
    /// anything else resolves under the input dir.
    pub fn resolve_input(&self, name: &str) -> PathBuf {
        let path = PathBuf::from(name);
        if path.is_absolute() || path.exists() {
            path
        } else {
            self.input_dir.join(path)
        }
    }

    /// Relative names always land under the output dir, never on a file of the same name in
    /// the working directory.
    pub fn resolve_output(&self, name: &str) -> PathBuf {
        let path = PathBuf::from(name);
        if path.is_absolute() {
            path
        } else {
            self.output_dir.join(path)
        }
    }
}

fn parse_heat_step(raw: Option<String>, default: f64) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(step) if step.is_finite() && step > 0.0 => step,
        _ => {
            warn!("invalid OUTFITTER_HEAT_STEP '{raw}', defaulting to {default}");
            default
        }
    }
}

fn parse_workers(raw: Option<String>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    raw.trim().parse::<usize>().unwrap_or_else(|_| {
        warn!("invalid OUTFITTER_WORKERS '{raw}', defaulting to {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = OutfitterConfig::from_lookup(|_| None);
        assert_eq!(config, OutfitterConfig::default());
        assert_eq!(config.heat_step, 10.0);
    }

    #[test]
    fn overrides_apply() {
        let config = OutfitterConfig::from_lookup(lookup_from(&[
            ("OUTFITTER_DATA_DIR", "/tmp/data"),
            ("OUTFITTER_CATALOG", "catalog.json"),
            ("OUTFITTER_HEAT_STEP", "2.5"),
            ("OUTFITTER_WORKERS", "4"),
            ("OUTFITTER_LOG", "debug"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/data"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.heat_step, 2.5);
        assert_eq!(config.workers, 4);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = OutfitterConfig::from_lookup(lookup_from(&[
            ("OUTFITTER_HEAT_STEP", "-3"),
            ("OUTFITTER_WORKERS", "many"),
        ]));
        assert_eq!(config.heat_step, DEFAULT_HEAT_STEP);
        assert_eq!(config.workers, 0);
    }

    #[test]
    fn relative_output_goes_under_output_dir_even_when_it_exists_here() {
        let config = OutfitterConfig::default();
        // Tests run from the package root, where Cargo.toml exists.
        assert!(std::path::Path::new("Cargo.toml").exists());
        assert_eq!(
            config.resolve_output("Cargo.toml"),
            PathBuf::from(DEFAULT_OUTPUT_DIR).join("Cargo.toml")
        );
        assert_eq!(config.resolve_input("Cargo.toml"), PathBuf::from("Cargo.toml"));
        assert_eq!(
            config.resolve_input("missing.txt"),
            PathBuf::from(DEFAULT_INPUT_DIR).join("missing.txt")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        let config = OutfitterConfig::default();
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("report.txt");
        assert_eq!(config.resolve_output(&out.to_string_lossy()), out);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = OutfitterConfig::from_lookup(lookup_from(&[("OUTFITTER_CATALOG", "  ")]));
        assert_eq!(config.catalog_path, None);
    }
}
