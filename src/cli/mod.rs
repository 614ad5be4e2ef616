/*
 * SPDX-FileCopyrightText: 2025 Barrank Authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface structs, functions, and methods.
//!
//! The binary has a single command, implemented in [`pagerank`]; this
//! module contains the shared arguments, the parsers, and the logger
//! initialization.

use anyhow::{anyhow, bail, ensure, Context, Result};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser};
use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
use jiff::SpanRound;
use std::io::Write;
use std::time::Duration;
use std::time::SystemTime;

pub mod pagerank;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    pub fn version_string() -> String {
        format!(
            "{}
git info: {} {} {}
build info: built on {} for {} with {}",
            PKG_VERSION,
            GIT_VERSION.unwrap_or(""),
            GIT_COMMIT_HASH.unwrap_or(""),
            match GIT_DIRTY {
                None => "",
                Some(true) => "(dirty)",
                Some(false) => "(clean)",
            },
            BUILD_DATE,
            TARGET,
            RUSTC_VERSION
        )
    }
}

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(...,  value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Parses a damping factor, which must lie in [0 . . 1).
pub fn alpha_parser(arg: &str) -> Result<f64> {
    let alpha = arg.parse::<f64>()?;
    ensure!(
        // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
        (0.0..1.0).contains(&alpha),
        "The damping factor must be in [0 . . 1), got {alpha}"
    );
    Ok(alpha)
}

/// Parses a logging interval such as `1d2h3m4s567`.
///
/// Each group of digits may be followed by a unit: `d` (days), `h` (hours),
/// `m` (minutes) or `s` (seconds). If no suffix is given, milliseconds are
/// assumed, so `1d2h3m4s567` is 93784567 milliseconds. Whitespace is
/// ignored.
pub fn parse_duration(value: &str) -> Result<Duration> {
    if value.trim().is_empty() {
        bail!("Empty duration string; use `0` to log at every update");
    }
    let mut duration = Duration::ZERO;
    let mut digits = String::new();
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let secs_per_unit = match c {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 24 * 60 * 60,
            _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
        };
        let amount = digits
            .parse::<u64>()
            .with_context(|| format!("Missing amount before suffix {c} in {value:?}"))?;
        duration += Duration::from_secs(amount * secs_per_unit);
        digits.clear();
    }
    if !digits.is_empty() {
        duration += Duration::from_millis(digits.parse::<u64>()?);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
pub fn init_env_logger() -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span
            .round(span_round)
            .map_err(|e| std::io::Error::other(format!("Failed to round span: {e}")))?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress while loading and iterating (default: 10s).
    /// Amounts take the suffixes "d", "h", "m", and "s"; a trailing amount
    /// without suffix is in milliseconds, as in "2m30s" or "1500".
    pub log_interval: Option<Duration>,
}

#[derive(Parser, Debug)]
#[command(name = "barrank", version=build_info::version_string())]
/// Computes PageRank on a graph given as an arc list, using a fixed number of
/// barrier-synchronized threads.
///
/// Noteworthy environment variables:
///
/// - RUST_MIN_STACK: minimum thread stack size (in bytes)
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>
pub struct Cli {
    #[clap(flatten)]
    pub args: pagerank::CliArgs,
    #[clap(flatten)]
    pub global_args: GlobalArgs,
}

/// Prints the usage message of the command on standard output.
pub fn print_usage() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", Cli::command().render_usage())?;
    Ok(())
}

/// The entry point of the command-line interface.
///
/// Missing arguments print the usage message and return successfully, as
/// do requests for help or version information.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                e.print()?;
                return Ok(());
            }
            ErrorKind::MissingRequiredArgument
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                return print_usage();
            }
            _ => return Err(e.into()),
        },
    };

    pagerank::main(cli.global_args, cli.args)?;

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Formats an elapsed time in seconds as weeks, days, hours, minutes and
/// seconds, followed by the raw number of seconds.
pub fn pretty_print_elapsed(elapsed: f64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (7 * 24 * 60 * 60, "week"),
        (24 * 60 * 60, "day"),
        (60 * 60, "hour"),
        (60, "minute"),
    ];
    let mut result = String::new();
    let mut rest = elapsed as u64;
    for (secs_per_unit, name) in UNITS {
        let count = rest / secs_per_unit;
        rest %= secs_per_unit;
        match count {
            0 => {}
            1 => result.push_str(&format!("1 {name} ")),
            _ => result.push_str(&format!("{count} {name}s ")),
        }
    }
    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}
