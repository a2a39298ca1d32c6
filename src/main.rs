mod actions;
mod archive;
mod cli;
mod config;
mod extract;
mod history;
mod report;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, Opts};
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether `debug!` prints anything
pub static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Exit codes:
/// 1 => program screwed up
fn main() {
    if let Err(err) = try_main() {
        error!("{}", err.to_string());
        err.chain().skip(1).for_each(|cause| {
            due_to!("{}", cause);
        });
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let opts = Opts::parse();
    VERBOSE.store(opts.verbose, Ordering::Relaxed);

    let config = Config::load(opts.config.as_ref()).context("Failed to load configuration")?;
    debug!("Scanning series: {}", opts.series(&config).join(", "));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    actions::run(&config, &opts, &mut out)
}
