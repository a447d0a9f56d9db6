//! Path expressions.
//!
//! A path expression turns a [`Binding`] into a relative path. In the
//! configuration document each node is a mapping recognized by the key it
//! carries:
//!
//! | Key | Node |
//! |-----|------|
//! | `path_format` (+ optional `parameters`) | [`PathExpression::Literal`] / [`PathExpression::Format`] |
//! | `mapping` + `key` | [`PathExpression::Mapping`] |
//! | `arg` | [`PathExpression::Arg`] |
//!
//! ```yaml
//! path_format: "{0}/{1}.pdf"
//! parameters:
//!   - arg: year
//!   - mapping: {fr: francais, en: english}
//!     key:
//!       arg: lang
//! ```

use crate::domain::Binding;
use crate::error::{Error, Result};
use crate::template;
use crate::value::ArgValue;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt::Write as _;

const SHAPE_KEYS: [&str; 3] = ["path_format", "mapping", "arg"];

/// A node of the path template language.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum PathExpression {
    /// A format string used verbatim, braces included.
    Literal(String),
    /// A format string whose `{N}` placeholders are filled with the
    /// evaluated `parameters`.
    Format {
        /// The template
        format: String,
        /// One sub-expression per placeholder position
        parameters: Vec<PathExpression>,
    },
    /// Evaluate `key`, then replace it through `table` when it is one of
    /// the table's keys. Unknown keys pass through unchanged.
    Mapping {
        /// Expression producing the lookup key
        key: Box<PathExpression>,
        /// Aliases, keyed by the string form of the key
        table: BTreeMap<String, ArgValue>,
    },
    /// The value bound to a parameter label.
    Arg(String),
}

impl PathExpression {
    /// Resolve this expression against `binding`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingBinding`] if an `arg` label is not bound
    /// - [`Error::Template`] if a format string cannot be expanded
    pub fn evaluate(&self, binding: &Binding<'_>) -> Result<String> {
        self.resolve(binding).map(|value| value.to_string())
    }

    /// Like [`PathExpression::evaluate`], keeping the type of bound values
    /// so that format specs can tell numbers from text.
    fn resolve(&self, binding: &Binding<'_>) -> Result<ArgValue> {
        match self {
            Self::Literal(format) => Ok(ArgValue::String(format.clone())),
            Self::Format { format, parameters } => {
                let values = parameters
                    .iter()
                    .map(|parameter| parameter.resolve(binding))
                    .collect::<Result<Vec<_>>>()?;
                template::expand(format, &values).map(ArgValue::String)
            }
            Self::Mapping { key, table } => {
                let key = key.resolve(binding)?;
                match table.get(&key.to_string()) {
                    Some(mapped) => Ok(mapped.clone()),
                    None => Ok(key),
                }
            }
            Self::Arg(label) => {
                binding
                    .get(label)
                    .cloned()
                    .ok_or_else(|| Error::MissingBinding {
                        label: label.clone(),
                        available: binding.labels().map(str::to_owned).collect(),
                    })
            }
        }
    }

    /// Decode a configuration node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedExpression`] when the node carries none or
    /// several of `path_format`, `mapping` and `arg`, or when the value
    /// under one of them has the wrong type.
    pub fn from_yaml(node: &Value) -> Result<Self> {
        let Value::Mapping(map) = node else {
            return Err(malformed(node, "expected a mapping"));
        };

        let shapes: Vec<&str> = SHAPE_KEYS
            .into_iter()
            .filter(|key| map.contains_key(*key))
            .collect();

        match shapes.as_slice() {
            ["path_format"] => Self::format_from_yaml(node, map),
            ["mapping"] => Self::mapping_from_yaml(node, map),
            ["arg"] => scalar(node, map, "arg").map(Self::Arg),
            [] => Err(malformed(node, "no recognized key")),
            several => Err(malformed(
                node,
                &format!("ambiguous, found {}", several.join(", ")),
            )),
        }
    }

    fn format_from_yaml(node: &Value, map: &Mapping) -> Result<Self> {
        let format = scalar(node, map, "path_format")?;
        match map.get("parameters") {
            None | Some(Value::Null) => Ok(Self::Literal(format)),
            Some(Value::Sequence(seq)) if seq.is_empty() => Ok(Self::Literal(format)),
            Some(Value::Sequence(seq)) => {
                let parameters = seq.iter().map(Self::from_yaml).collect::<Result<_>>()?;
                Ok(Self::Format { format, parameters })
            }
            Some(_) => Err(malformed(node, "`parameters' should be a sequence")),
        }
    }

    fn mapping_from_yaml(node: &Value, map: &Mapping) -> Result<Self> {
        let key = map
            .get("key")
            .ok_or_else(|| malformed(node, "missing key `key'"))?;

        let table = match map.get("mapping") {
            Some(Value::Mapping(entries)) => entries
                .iter()
                .map(|(from, to)| match (ArgValue::from_yaml(from), ArgValue::from_yaml(to)) {
                    (Some(from), Some(to)) => Ok((from.to_string(), to)),
                    _ => Err(malformed(node, "`mapping' entries should be scalars")),
                })
                .collect::<Result<_>>()?,
            Some(Value::Null) => BTreeMap::new(),
            _ => return Err(malformed(node, "`mapping' should be a mapping")),
        };

        Ok(Self::Mapping {
            key: Box::new(Self::from_yaml(key)?),
            table,
        })
    }
}

impl TryFrom<Value> for PathExpression {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_yaml(&value)
    }
}

fn scalar(node: &Value, map: &Mapping, key: &str) -> Result<String> {
    map.get(key)
        .and_then(ArgValue::from_yaml)
        .map(|value| value.to_string())
        .ok_or_else(|| malformed(node, &format!("`{key}' should be a scalar")))
}

fn malformed(node: &Value, reason: &str) -> Error {
    Error::MalformedExpression {
        node: render(node),
        reason: reason.to_owned(),
    }
}

/// Render a node on a single line for error messages.
fn render(node: &Value) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

fn render_into(node: &Value, out: &mut String) {
    match node {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::String(s) => {
            let _ = write!(out, "{s:?}");
        }
        Value::Sequence(seq) => {
            out.push('[');
            for (i, item) in seq.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(item, out);
            }
            out.push(']');
        }
        Value::Mapping(map) => {
            out.push('{');
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(key, out);
                out.push_str(": ");
                render_into(value, out);
            }
            out.push('}');
        }
        Value::Tagged(tagged) => {
            let _ = write!(out, "{} ", tagged.tag);
            render_into(&tagged.value, out);
        }
    }
}
