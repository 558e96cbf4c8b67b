use std::num::NonZeroUsize;
use std::process::ExitCode;

use clap::Parser;
use git_mtimestamp::{Options, DEFAULT_CONCURRENCY};

/// Updates file and directory timestamps based on Git history
#[derive(Parser, Debug)]
#[command(name = "git-mtimestamp", version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Maximum number of timestamp updates in flight
    #[arg(short, long, env = "GIT_MTIMESTAMP_JOBS", default_value_t = DEFAULT_CONCURRENCY)]
    jobs: NonZeroUsize,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_micros()
        .format_target(false)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = Options {
        concurrency: args.jobs,
    };

    let start = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine current directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    match git_mtimestamp::run(&start, &options) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
