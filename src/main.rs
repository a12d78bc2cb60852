//! Pakman - packs scripts and stylesheets into bundles.

mod asset;
mod bundle;
mod cli;
mod config;
mod logger;
mod marker;
mod pack;
mod utils;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::PakmanConfig;
use utils::fs::ProjectFs;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log!("error"; "{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = PakmanConfig::load(cli)?;
    let fs = ProjectFs::new(config.get_root());
    debug!("config"; "using {} (root {})", config.config_path.display(), fs.root().display());
    let summary = pack::run(&config, &fs)?;

    let regions = summary.dependencies.as_ref().map_or(0, |deps| deps.regions);
    if summary.bundles_failed > 0 {
        log!(
            "pack"; "done: {} bundle(s), {} region(s), {} bundle(s) failed",
            summary.bundles_packed, regions, summary.bundles_failed
        );
    } else {
        log!("pack"; "done: {} bundle(s), {} region(s)", summary.bundles_packed, regions);
    }
    Ok(())
}
