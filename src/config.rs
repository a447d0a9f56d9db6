//! Configuration documents.
//!
//! ```yaml
//! input_base: /home/me/courses
//! output_base: /srv/www/courses
//! clients:
//!   - name: slides
//!     arguments:
//!       n: [1, 2, 3]
//!       lang: [fr, en]
//!     input:
//!       path_format: "{0}/slides{1}.pdf"
//!       parameters:
//!         - arg: lang
//!         - arg: n
//!     output:
//!       path_format: "slides-{0}-{1}.pdf"
//!       parameters:
//!         - arg: n
//!         - arg: lang
//! ```
//!
//! Anchors, aliases and `<<` merge keys are resolved before decoding, so
//! clients can share argument tables.

use crate::domain::Arguments;
use crate::error::{Error, Result};
use crate::expr::PathExpression;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A parsed configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Configuration {
    /// Directory input expressions are resolved against
    pub input_base: PathBuf,
    /// Directory output expressions are resolved against
    pub output_base: PathBuf,
    /// Clients, processed in this order
    pub clients: Vec<Client>,
}

/// A named family of input → output copies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Client {
    /// Shown in verbose output
    pub name: String,
    /// Parameters and their candidate values
    pub arguments: Arguments,
    /// Input path, relative to [`Configuration::input_base`]
    pub input: PathExpression,
    /// Output path, relative to [`Configuration::output_base`]
    pub output: PathExpression,
}

impl Configuration {
    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, and the errors of
    /// [`Configuration::from_str`] otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        text.parse()
    }
}

impl FromStr for Configuration {
    type Err = Error;

    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyConfig`] for an empty document
    /// - [`Error::Parse`] for invalid YAML, missing keys and malformed
    ///   expressions or argument tables
    fn from_str(text: &str) -> Result<Self> {
        let mut value: Value = serde_yaml::from_str(text)?;
        let empty = match &value {
            Value::Null => true,
            Value::Mapping(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            return Err(Error::EmptyConfig);
        }

        value.apply_merge()?;
        Ok(serde_yaml::from_value(value)?)
    }
}
