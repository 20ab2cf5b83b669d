// Author: Dustin Pilgrim
// License: MIT

mod cli;
mod config;
mod host;
mod logging;
mod paths;
mod run;
mod session;

use clap::Parser;

use crate::cli::Args;

fn main() {
    let args = Args::parse();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| paths::default_log_path("cropkit.log"));

    if let Err(e) = logging::init_logging(&log_path, args.verbose) {
        // Logging isn't up yet; stderr is the only place left.
        eprintln!("cropkit: failed to init logging: {e}");
        std::process::exit(1);
    }

    eventline::info!("cropkit starting");
    eventline::debug!("log_path={}", log_path.display());

    let config_path = args.config.clone().unwrap_or_else(paths::default_config_path);
    let cfg = match config::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eventline::error!("{}: {e}", config_path.display());
            std::process::exit(1);
        }
    };
    eventline::debug!("config: {:?}", cfg);

    if let Err(e) = run::run(args, &cfg) {
        eventline::error!("{e}");
        eprintln!("cropkit: {e}");
        std::process::exit(1);
    }
}
