use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use levelfilter_core::{LevelFilter, LineLogger};
use levelfilter_types::{DEFAULT_LEVELS, LogLevel};

/// Levelfilter - severity filtering for line-oriented logs
#[derive(Parser, Debug)]
#[command(name = "levelfilter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Demo to run
    #[arg(value_enum, default_value_t = Scenario::Showcase)]
    scenario: Scenario,

    /// Lowest level that is printed
    #[arg(long, default_value = "DEBUG")]
    min_level: String,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Disable tag alignment
    #[arg(long)]
    no_align: bool,

    /// Text written at the start of every line
    #[arg(long, default_value = "")]
    prefix: String,

    /// Write a timestamp in front of every line
    #[arg(long)]
    timestamps: bool,

    /// Number of fizz-buzz rounds
    #[arg(long, default_value = "100")]
    count: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scenario {
    /// One line per standard level
    Showcase,
    /// Fizz-buzz with a level per outcome
    FizzBuzz,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let result = run_app(args);

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

fn run_app(args: Args) -> Result<()> {
    let filter = LevelFilter::builder(io::stdout())
        .levels(DEFAULT_LEVELS)
        .min_level(LogLevel::new(args.min_level))
        .color(!args.no_color)
        .align(!args.no_align)
        .try_build()
        .context("invalid filter configuration")?;

    tracing::debug!(?filter, "filter ready");

    let logger = LineLogger::new(filter)
        .with_prefix(args.prefix)
        .with_timestamps(args.timestamps);

    match args.scenario {
        Scenario::Showcase => showcase(&logger)?,
        Scenario::FizzBuzz => fizz_buzz(&logger, args.count)?,
    }

    logger.flush().context("failed to flush output")?;
    Ok(())
}

fn showcase<W: Write>(logger: &LineLogger<W>) -> io::Result<()> {
    logger.log("DEBUG", format_args!("This is a debug message"))?;
    logger.log("INFO", format_args!("This is an info message"))?;
    logger.log("WARN", format_args!("This is a warning"))?;
    logger.log("ERROR", format_args!("This is an error message"))?;
    logger.log("CRIT", format_args!("Something went badly wrong"))?;
    Ok(())
}

fn fizz_buzz<W: Write>(logger: &LineLogger<W>, count: u32) -> io::Result<()> {
    for i in 1..=count {
        match (i % 3, i % 5) {
            (0, 0) => logger.log("CRIT", format_args!("FIZZBUZZ"))?,
            (_, 0) => logger.log("ERROR", format_args!("BUZZ"))?,
            (0, _) => logger.log("WARN", format_args!("FIZZ"))?,
            _ => logger.log("DEBUG", format_args!("{}", i))?,
        }
    }
    Ok(())
}
