use std::path::Path;

use tracing::info;

use crate::config::OutfitterConfig;
use crate::data::catalog::{load_catalog_json, load_denylist, Catalog, Denylist};
use crate::data::game_data::load_game_data_dir;
use crate::data::input::load_input;
use crate::data::ship::Ship;
use crate::error::Result;
use crate::optimizer::{expansion_sweep, prune_for_ship, single_search, SearchMode, SearchOptions};
use crate::parallel::WorkerPool;
use crate::report;

const USAGE: &str =
    "usage: outfitter <search|sweep|prune> <input-file> [--parallel] [--json] [--out <file>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Search,
    Sweep,
    Prune,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("search") => Some(Command::Search),
        Some("sweep") => Some(Command::Sweep),
        Some("prune") => Some(Command::Prune),
        _ => None,
    }
}

/// Flags shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    pub input: String,
    pub parallel: bool,
    pub json: bool,
    pub out: Option<String>,
}

pub fn parse_command_args(args: &[String]) -> std::result::Result<CommandArgs, String> {
    let mut parsed = CommandArgs::default();
    let mut input = None;
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--parallel" => parsed.parallel = true,
            "--json" => parsed.json = true,
            "--out" => {
                let Some(path) = rest.next() else {
                    return Err("--out needs a file name".to_string());
                };
                parsed.out = Some(path.clone());
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
            value if input.is_none() => input = Some(value.to_string()),
            value => return Err(format!("unexpected argument '{value}'")),
        }
    }
    parsed.input = input.ok_or_else(|| "missing input file".to_string())?;
    Ok(parsed)
}

pub fn run_with_args(args: &[String]) -> i32 {
    run_with_config(args, &OutfitterConfig::from_env())
}

pub fn run_with_config(args: &[String], config: &OutfitterConfig) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let command_args = match parse_command_args(args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{USAGE}");
            return 2;
        }
    };

    match run_command(command, &command_args, config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{command:?} failed: {err}");
            1
        }
    }
}

fn run_command(command: Command, args: &CommandArgs, config: &OutfitterConfig) -> Result<()> {
    let catalog = load_catalog(config)?;
    let denylist = load_denylist(&config.denylist_path)?;
    let input_path = config.resolve_input(&args.input);
    let ship = load_input(&input_path, &catalog)?;
    let options = SearchOptions {
        heat_step: config.heat_step,
        mode: if args.parallel {
            SearchMode::Parallel
        } else {
            SearchMode::Sequential
        },
        pool: WorkerPool::with_workers(config.workers),
        ..SearchOptions::default()
    };
    info!(?command, ship = %ship.name, input = %input_path.display(), "running");

    let rendered = match command {
        Command::Search => handle_search(&ship, &catalog, &denylist, &options, args)?,
        Command::Sweep => handle_sweep(&ship, &catalog, &denylist, &options, args, config)?,
        Command::Prune => handle_prune(&ship, &catalog, &denylist, args)?,
    };

    println!("{rendered}");
    if let Some(out) = &args.out {
        let path = config.resolve_output(out);
        // Sweep CSV is written by handle_sweep.
        if !(command == Command::Sweep && is_csv(&path)) {
            report::write_report(&path, &rendered)?;
        }
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn load_catalog(config: &OutfitterConfig) -> Result<Catalog> {
    match &config.catalog_path {
        Some(path) => load_catalog_json(path),
        None => load_game_data_dir(&config.data_dir),
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn handle_search(
    ship: &Ship,
    catalog: &Catalog,
    denylist: &Denylist,
    options: &SearchOptions,
    args: &CommandArgs,
) -> Result<String> {
    let loadout = single_search(ship, catalog, denylist, options)?;
    if args.json {
        report::to_json(&loadout)
    } else {
        Ok(report::render_loadout(&loadout))
    }
}

fn handle_sweep(
    ship: &Ship,
    catalog: &Catalog,
    denylist: &Denylist,
    options: &SearchOptions,
    args: &CommandArgs,
    config: &OutfitterConfig,
) -> Result<String> {
    let steps = expansion_sweep(ship, catalog, denylist, options)?;
    if let Some(out) = &args.out {
        let path = config.resolve_output(out);
        if is_csv(&path) {
            report::write_report(&path, &report::sweep_to_csv(&steps)?)?;
        }
    }
    if args.json {
        report::to_json(&steps)
    } else {
        Ok(report::render_sweep(ship, &steps))
    }
}

fn handle_prune(
    ship: &Ship,
    catalog: &Catalog,
    denylist: &Denylist,
    args: &CommandArgs,
) -> Result<String> {
    let candidates = prune_for_ship(ship, catalog, denylist);
    if args.json {
        let names: Vec<&str> = candidates.names().collect();
        report::to_json(&names)
    } else {
        Ok(report::render_candidates(ship, &candidates))
    }
}
