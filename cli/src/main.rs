//! smartcp - templated smart copies
//!
//! Reads configuration files and copies every resolved input to its output
//! unless the output is already identical.

use clap::{ArgAction, Parser};
use smartcp::{Configuration, Error as SyncError, Logger, PinSet, Planner, SyncOptions, SyncStats};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

const EXAMPLES: &str = "\
Examples:
  smartcp config.yml - */config.yml  Do smart copies for config.yml,
                                     then standard input,
                                     then all config.yml in a subdirectory.
  smartcp                            Do smart copies for standard input.";

/// Read FILE(s) and do smart copies accordingly
///
/// With no FILE, or when FILE is -, read standard input.
#[derive(Parser, Debug)]
#[command(name = "smartcp", version, about, long_about = None, after_help = EXAMPLES)]
struct Args {
    /// Configuration files, processed in order
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Set the argument labelled LABEL to VALUE instead of iterating over
    /// all of its possible values
    #[arg(short = 's', long = "set", value_name = "LABEL=VALUE", value_parser = parse_pin)]
    pins: Vec<(String, String)>,

    /// Increment verbose level, -vv shows up-to-date files, -vvv traces internals
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Print what would be copied without actually copying
    #[arg(short = 'n', long = "plan", alias = "dry-run")]
    plan: bool,

    /// Do not call fsync after each copied file (faster but less safe)
    #[arg(long)]
    no_sync: bool,
}

/// Parse a `label=value` pin; exactly one `=` is allowed.
fn parse_pin(s: &str) -> Result<(String, String), String> {
    let mut parts = s.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(label), Some(value), None) => Ok((label.to_owned(), value.to_owned())),
        _ => Err(format!("{s} should have the format `arg=value'")),
    }
}

/// Where a configuration document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    fn from_arg(path: &Path) -> Self {
        if path == Path::new("-") {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("{path}: No such file or directory")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read standard input: {source}")]
    ReadStdin { source: io::Error },

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. } | Self::ReadStdin { .. } | Self::Sync(_) => 1,
        }
    }
}

fn main() {
    if let Err(error) = run() {
        eprintln!("smartcp: {error}");
        std::process::exit(error.exit_code());
    }
}

fn run() -> CliResult<()> {
    let args = Args::parse();

    if args.verbose >= 3 {
        init_tracing();
    }

    let pins: PinSet = args.pins.iter().cloned().collect();
    let options = build_options(&args);
    let mut log = Logger::stdout(args.verbose);

    let sources: Vec<Source> = if args.files.is_empty() {
        vec![Source::Stdin]
    } else {
        args.files.iter().map(|path| Source::from_arg(path)).collect()
    };

    let mut total = SyncStats::default();
    for source in &sources {
        let stats = sync_source(source, &pins, &options, &mut log)?;
        total.merge(stats);
    }

    if args.verbose > 0 {
        print_stats(&total, args.plan);
    }
    Ok(())
}

fn build_options(args: &Args) -> SyncOptions {
    let mut options = SyncOptions::default();
    if args.plan {
        options = options.with_plan();
    }
    if args.no_sync {
        options = options.without_fsync();
    }
    options
}

fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();
    // Only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
    tracing::debug!("tracing enabled");
}

/// Run one configuration source as an independent pass.
fn sync_source(
    source: &Source,
    pins: &PinSet,
    options: &SyncOptions,
    log: &mut Logger,
) -> CliResult<SyncStats> {
    let config = match source {
        Source::Stdin => {
            log.info("Using stdin");
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::ReadStdin { source })?;
            text.parse::<Configuration>()?
        }
        Source::File(path) => {
            if !path.exists() {
                return Err(CliError::ConfigNotFound { path: path.clone() });
            }
            log.info(format_args!("Using {}", path.display()));
            Configuration::load(path)?
        }
    };

    log.indent();
    let result = Planner::new(&config, pins, options).run(log);
    log.dedent();
    Ok(result?)
}

fn print_stats(stats: &SyncStats, plan: bool) {
    let (heading, copied) = if plan {
        ("Plan summary:", "Files to copy:")
    } else {
        ("Sync summary:", "Files copied:")
    };
    println!("{heading}");
    println!("  {:<16}{}", copied, stats.copied);
    println!("  {:<16}{}", "Bytes:", format_bytes(stats.bytes_copied));
    println!("  {:<16}{}", "Up to date:", stats.up_to_date);
    println!("  {:<16}{}", "Missing inputs:", stats.missing_inputs);
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
