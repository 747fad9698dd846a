//! Human-readable and machine-readable renderings of search results, and writing them to
//! disk.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::data::ship::Ship;
use crate::error::{OutfitterError, Result};
use crate::optimizer::{CandidateSet, LoadoutReport, SweepStep};

/// Shipyard-style summary of a ship's space, energy and heat.
pub struct ShipSummary<'a>(pub &'a Ship);

impl fmt::Display for ShipSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ship = self.0;
        writeln!(f, "{}", ship.name)?;
        writeln!(f, "    Available Space: {}", ship.stats.space)?;
        writeln!(f, "    Min Energy Regen: {}", ship.stats.energy)?;
        write!(f, "    Maximum Internal Heat: {}", ship.net_heat())
    }
}

fn install_line(report: &LoadoutReport) -> String {
    let line = match &report.result.items {
        Some(items) => format!("Install: {items:?}"),
        None => "Install: none (no loadout keeps heat at or below zero)".to_string(),
    };
    if report.result.is_truncated() {
        format!("{line}\n(install cap reached; a longer loadout may do better)")
    } else {
        line
    }
}

pub fn render_loadout(report: &LoadoutReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ShipSummary(&report.before));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", install_line(report));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", ShipSummary(&report.after));
    out
}

pub fn render_sweep(ship: &Ship, steps: &[SweepStep]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ORIGINAL SHIP");
    let _ = writeln!(out, "{}", ShipSummary(ship));
    let _ = writeln!(out);
    for step in steps {
        let _ = writeln!(out, "EXPANSIONS: {}", step.expansions);
        let _ = writeln!(out, "{}", ShipSummary(&step.report.after));
        let _ = writeln!(out, "{}", install_line(&step.report));
        let _ = writeln!(out);
    }
    out
}

pub fn render_candidates(ship: &Ship, candidates: &CandidateSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ShipSummary(ship));
    let _ = writeln!(out);
    let _ = writeln!(out, "CANDIDATES ({})", candidates.len());
    for name in candidates.names() {
        let _ = writeln!(out, "  {name}");
    }
    out
}

/// JSON envelope with a generation timestamp.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a, T: Serialize> {
    pub generated_at: String,
    pub report: &'a T,
}

pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    let envelope = ReportEnvelope {
        generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        report,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

#[derive(Debug, Serialize)]
struct SweepRow<'a> {
    expansions: i32,
    feasible: bool,
    energy: Option<f64>,
    leftover_space: i32,
    net_heat: f64,
    cooling_inefficiency: f64,
    candidates: usize,
    install: &'a str,
    truncated: bool,
}

/// One CSV row per sweep step; the install list is `;`-joined.
pub fn sweep_to_csv(steps: &[SweepStep]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for step in steps {
        let install = step.report.result.items().join(";");
        writer.serialize(SweepRow {
            expansions: step.expansions,
            feasible: step.report.result.is_feasible(),
            energy: step.report.result.output,
            leftover_space: step.report.result.leftover,
            net_heat: step.report.after.net_heat(),
            cooling_inefficiency: step.report.coefficients.cooling_inefficiency,
            candidates: step.report.candidate_count,
            install: &install,
            truncated: step.report.result.is_truncated(),
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| OutfitterError::Csv(err.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write a rendered report, creating parent directories as needed.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| OutfitterError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, contents).map_err(write_err)
}
