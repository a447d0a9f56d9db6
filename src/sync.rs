//! The sync planner.
//!
//! For each client, in declaration order, and each of its bindings, in
//! product order:
//!
//! 1. resolve the input path; skip the binding if the input does not exist
//! 2. resolve the output path and check its directory exists (fatal if not)
//! 3. leave byte-identical outputs alone
//! 4. copy everything else
//!
//! Missing inputs are routine, they are how sparse expansion grids get
//! pruned. A missing destination directory means the environment is wrong
//! and aborts the whole run.

use crate::config::{Client, Configuration};
use crate::copy::{check_parent, copy_file, up_to_date};
use crate::domain::{Binding, Domain, PinSet};
use crate::error::{Error, Result};
use crate::log::Logger;
use crate::options::SyncOptions;
use std::fs;
use std::path::{Path, PathBuf};

/// Statistics from a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Number of files copied (or, in plan mode, that would be copied)
    pub copied: u64,
    /// Number of outputs already identical to their input
    pub up_to_date: u64,
    /// Number of bindings whose input does not exist
    pub missing_inputs: u64,
    /// Total bytes copied (in plan mode, the size of the pending inputs)
    pub bytes_copied: u64,
}

impl SyncStats {
    /// Add the counters of `other` to `self`.
    pub fn merge(&mut self, other: SyncStats) {
        self.copied += other.copied;
        self.up_to_date += other.up_to_date;
        self.missing_inputs += other.missing_inputs;
        self.bytes_copied += other.bytes_copied;
    }
}

/// What happens to one resolved pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The input does not exist
    MissingInput {
        /// Resolved input path
        input: PathBuf,
    },
    /// The output already holds the input's bytes
    UpToDate {
        /// Resolved input path
        input: PathBuf,
        /// Resolved output path
        output: PathBuf,
    },
    /// The output is missing or differs
    Copy {
        /// Resolved input path
        input: PathBuf,
        /// Resolved output path
        output: PathBuf,
    },
}

/// Runs one configuration document.
///
/// # Example
///
/// ```no_run
/// use smartcp::{Configuration, Logger, PinSet, Planner, SyncOptions};
/// use std::path::Path;
///
/// let config = Configuration::load(Path::new("smartcp.yml"))?;
/// let pins = PinSet::new();
/// let options = SyncOptions::default();
/// let mut log = Logger::stdout(1);
///
/// let stats = Planner::new(&config, &pins, &options).run(&mut log)?;
/// println!("{} copied, {} up to date", stats.copied, stats.up_to_date);
/// # Ok::<(), smartcp::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    config: &'a Configuration,
    pins: &'a PinSet,
    options: &'a SyncOptions,
}

impl<'a> Planner<'a> {
    /// Create a planner for `config`.
    #[must_use]
    pub fn new(config: &'a Configuration, pins: &'a PinSet, options: &'a SyncOptions) -> Self {
        Self {
            config,
            pins,
            options,
        }
    }

    /// Process every client.
    ///
    /// # Errors
    ///
    /// Stops at the first error: unresolvable expression, missing
    /// destination directory or failed copy. Files copied before the error
    /// stay in place.
    pub fn run(&self, log: &mut Logger) -> Result<SyncStats> {
        let mut stats = SyncStats::default();
        for client in &self.config.clients {
            log.info(format_args!("Updating {}", client.name));
            log.indent();
            let result = self.run_client(client, log, &mut stats);
            log.dedent();
            result?;
        }
        Ok(stats)
    }

    fn run_client(&self, client: &Client, log: &mut Logger, stats: &mut SyncStats) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::debug!(client = %client.name, parameters = client.arguments.len(), "expanding client");

        for binding in Domain::new(&client.arguments, self.pins) {
            match self.decide(client, &binding, log)? {
                Action::MissingInput { .. } => stats.missing_inputs += 1,
                Action::UpToDate { input, output } => {
                    log.detail(format_args!(
                        "\"{}\" == \"{}\"",
                        input.display(),
                        output.display()
                    ));
                    stats.up_to_date += 1;
                }
                Action::Copy { input, output } => {
                    log.info(format_args!(
                        "\"{}\" -> \"{}\"",
                        input.display(),
                        output.display()
                    ));
                    stats.bytes_copied += self.transfer(&input, &output)?;
                    stats.copied += 1;
                }
            }
        }
        Ok(())
    }

    /// Resolve the paths of one binding and classify the pair.
    ///
    /// # Errors
    ///
    /// Fails if an expression cannot be evaluated, if the output directory
    /// does not exist, or if the files cannot be compared.
    pub fn decide(
        &self,
        client: &Client,
        binding: &Binding<'_>,
        log: &mut Logger,
    ) -> Result<Action> {
        let input = self.config.input_base.join(client.input.evaluate(binding)?);
        if !input.exists() {
            #[cfg(feature = "tracing")]
            tracing::trace!(input = %input.display(), "input missing, skipping");
            return Ok(Action::MissingInput { input });
        }

        let output = self
            .config
            .output_base
            .join(client.output.evaluate(binding)?);

        if let Err(error) = check_parent(&output) {
            log.info(format_args!(
                "\"{}\" /\\ \"{}\"",
                input.display(),
                output.display()
            ));
            return Err(error);
        }

        if up_to_date(&input, &output)? {
            Ok(Action::UpToDate { input, output })
        } else {
            Ok(Action::Copy { input, output })
        }
    }

    fn transfer(&self, input: &Path, output: &Path) -> Result<u64> {
        if self.options.plan {
            let meta = fs::metadata(input).map_err(|e| Error::io(input, e))?;
            return Ok(meta.len());
        }

        let bytes = copy_file(input, output, self.options.fsync)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            bytes,
            "copied"
        );

        Ok(bytes)
    }
}
