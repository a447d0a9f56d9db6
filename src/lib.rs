//! # smartcp
//!
//! Templated bulk file copies driven by a declarative configuration.
//!
//! A configuration lists *clients*. Each client declares parameters with a
//! list of candidate values, plus an input and an output *path expression*.
//! For every combination of parameter values, the input path is resolved
//! and, if that file exists, copied to the resolved output path unless the
//! output is already byte-identical.
//!
//! ## Core Features
//!
//! - **Path expressions**: format strings, parameter references, value
//!   aliasing through mapping tables, arbitrarily nested
//! - **Cartesian expansion**: every combination of parameter values, in a
//!   stable order
//! - **Pins**: fix a parameter to one value from the command line; clients
//!   that do not have that value are skipped
//! - **Idempotent**: identical outputs are detected and left alone, so a
//!   failed run can simply be repeated
//! - **Atomic writes**: files are written to a temp file and renamed into
//!   place
//!
//! ## Quick Start
//!
//! ```no_run
//! use smartcp::{Configuration, Logger, PinSet, Planner, SyncOptions};
//!
//! let config: Configuration = r#"
//! input_base: /in
//! output_base: /out
//! clients:
//!   - name: c
//!     arguments: {n: [1, 2]}
//!     input: {path_format: "f{0}.txt", parameters: [{arg: n}]}
//!     output: {path_format: "g{0}.txt", parameters: [{arg: n}]}
//! "#.parse()?;
//!
//! let stats = Planner::new(&config, &PinSet::new(), &SyncOptions::default())
//!     .run(&mut Logger::stdout(1))?;
//! println!("Copied {} files", stats.copied);
//! # Ok::<(), smartcp::Error>(())
//! ```
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with tracing crate |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod copy;
mod domain;
mod error;
mod expr;
mod log;
mod options;
mod sync;
mod template;
mod value;

pub use config::{Client, Configuration};
pub use copy::{check_parent, copy_file, up_to_date};
pub use domain::{Arguments, Binding, Domain, Parameter, PinSet, build_domain};
pub use error::{Error, Result};
pub use expr::PathExpression;
pub use log::{DETAIL, INFO, Logger};
pub use options::SyncOptions;
pub use sync::{Action, Planner, SyncStats};
pub use value::ArgValue;
