use std::env;

use outfitter::cli::run_with_config;
use outfitter::config::OutfitterConfig;
use outfitter::logging::init_logging;

fn main() {
    let config = OutfitterConfig::from_env();
    init_logging(&config.log_level);
    let args: Vec<String> = env::args().collect();
    std::process::exit(run_with_config(&args, &config));
}
