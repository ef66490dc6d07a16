//! Cage - headless runner
//!
//! Usage: `cage [LEVEL_FILE] [--ticks N] [--settings FILE] [--seed S]`
//!
//! Without a level file a seeded demo cage is used. Set `RUST_LOG=debug` to
//! see every contact.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cage::sim::{Cage, TickInput, tick};
use cage::{Level, Settings};

/// Run balls around a cage of walls without a window
#[derive(Debug, clap::Parser)]
#[clap(version, about)]
struct Args {
    /// Level file; a seeded demo cage is used when omitted
    level: Option<PathBuf>,
    /// Number of fixed timesteps to run
    #[clap(long, default_value_t = 600)]
    ticks: u64,
    /// JSON settings file
    #[clap(long)]
    settings: Option<PathBuf>,
    /// Seed for the demo cage
    #[clap(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();

    let level = match &args.level {
        Some(path) => match Level::load(path) {
            Ok(level) => level,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::info!("No level file given, using demo cage with seed {}", args.seed);
            Level::demo(args.seed)
        }
    };

    let dt = settings.effective_dt();
    let ticks = args.ticks;
    log::info!(
        "Running {} ticks at dt={} (edges: {}, contact order: {})",
        ticks,
        dt,
        settings.rules.check_edges,
        settings.rules.contact_order.as_str()
    );

    let mut cage = Cage::new(level, settings.rules);
    let input = TickInput::default();
    for _ in 0..ticks {
        tick(&mut cage, &input, dt);

        if settings.report_interval > 0 && cage.time_ticks % settings.report_interval == 0 {
            for ball in &cage.balls {
                log::info!(
                    "tick {:>6} ball {:>3} pos {} vel {}",
                    cage.time_ticks,
                    ball.id,
                    ball.pos,
                    ball.vel
                );
            }
        }
    }

    log::info!(
        "Done: {} ticks, {} contacts, total speed {:.3}",
        cage.time_ticks,
        cage.contacts,
        cage.total_speed()
    );
    ExitCode::SUCCESS
}
