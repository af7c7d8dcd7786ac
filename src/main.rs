use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::{LevelFilter, error, info};

use sample_ring::soak::{self, Config};

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Ring buffer capacity in samples
    #[arg(short, long, default_value_t = Config::DEFAULT_CAPACITY, env = "SAMPLE_RING_CAPACITY")]
    capacity: usize,

    /// Number of push or pop operations to perform
    #[arg(short, long, default_value_t = Config::DEFAULT_ITERATIONS, env = "SAMPLE_RING_ITERATIONS")]
    iterations: u64,

    /// Largest push or pop request in samples
    ///
    /// Values above the capacity exercise truncation of oversized pushes.
    #[arg(short, long, default_value_t = Config::DEFAULT_MAX_CHUNK, env = "SAMPLE_RING_MAX_CHUNK")]
    max_chunk: usize,

    /// Seed for the traffic generator
    #[arg(short, long, default_value_t = Config::DEFAULT_SEED, env = "SAMPLE_RING_SEED")]
    seed: u64,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
}

/// Initializes logging from the command line verbosity.
///
/// `RUST_LOG` takes precedence over the flags when set.
fn init_logger(args: &Args) {
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "off"),
    );

    if std::env::var_os("RUST_LOG").is_none() {
        let level = if args.quiet {
            LevelFilter::Warn
        } else {
            match args.verbose {
                0 => LevelFilter::Info,
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        };

        logger.filter_module(module_path!(), level);
        logger.filter_module("sample_ring", level);
    }

    logger.init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(&args);

    let config = Config {
        capacity: args.capacity,
        iterations: args.iterations,
        max_chunk: args.max_chunk,
        seed: args.seed,
    };

    info!(
        "soaking a {} sample ring buffer with {} operations of up to {} samples (seed {:#x})",
        config.capacity, config.iterations, config.max_chunk, config.seed
    );

    match soak::run(&config) {
        Ok(report) => {
            info!(
                "{} pushes and {} pops: {} samples pushed, {} popped, {} overwritten, {} laps",
                report.pushes,
                report.pops,
                report.samples_pushed,
                report.samples_popped,
                report.samples_overwritten,
                report.laps
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
