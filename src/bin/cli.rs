use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use holiday_ics::pipeline::{self, DEFAULT_CONFIG_FILE, GenerateOptions};
use holiday_ics::{DEFAULT_NAME_PREFIX, YearRange, resolve_output_dir};

/// Generate iCalendar files of public holidays from a JSON definition.
#[derive(Parser)]
#[command(name = "feiertage", version, about = "Holiday calendar generator")]
struct Cli {
    /// Directory the .ics files are written to (defaults to the working directory).
    output_dir: Option<PathBuf>,

    /// Calendar definition; rewritten in place with any newly assigned identifiers.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// First year to generate Easter-relative holidays for (defaults to the current year).
    #[arg(long)]
    from_year: Option<i32>,

    /// Last year to generate Easter-relative holidays for.
    #[arg(long)]
    to_year: Option<i32>,

    /// Label shown in front of every calendar name.
    #[arg(long, default_value = DEFAULT_NAME_PREFIX)]
    prefix: String,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Warnings by default, one level more per `-v`. A set `RUST_LOG` wins.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let output_dir = resolve_output_dir(cli.output_dir.as_deref())?;
    let today = pipeline::local_today();
    let years = YearRange::from_bounds(cli.from_year, cli.to_year, today)?;

    let mut options = GenerateOptions::new(cli.config, output_dir, years);
    options.name_prefix = cli.prefix;

    let summary = pipeline::run(&options).with_context(|| {
        format!(
            "failed to generate calendars from {}",
            options.config_path.display()
        )
    })?;

    for written in &summary.calendars {
        println!("{} ({} events)", written.path.display(), written.events);
    }
    if summary.new_identifiers > 0 {
        println!(
            "assigned {} new identifiers in {}",
            summary.new_identifiers,
            options.config_path.display()
        );
    }
    Ok(())
}
