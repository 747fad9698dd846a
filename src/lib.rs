//! Outfit loadout optimizer: prune dominated outfits, then search for the combination that
//! maximizes energy while keeping a ship's heat at or below zero.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod optimizer;
pub mod parallel;
pub mod report;

pub use error::{OutfitterError, Result};
