//! Argument domains, pins and bindings.
//!
//! Each client declares an ordered list of parameters, each with an ordered
//! list of values. The set of [`Binding`]s a client is expanded over is the
//! cartesian product of those lists, in declaration order with the last
//! parameter varying fastest.
//!
//! A [`PinSet`] narrows the product: a pinned parameter keeps only the
//! declared value whose string form equals the pin. When no value matches,
//! that factor is empty and so is the whole product, which is how a pin
//! that does not apply to a client turns into "nothing to do" for it.
//!
//! ```
//! use smartcp::{Arguments, PinSet, build_domain};
//!
//! let arguments: Arguments = serde_yaml::from_str("{n: [1, 2], lang: [fr, en]}")?;
//! assert_eq!(build_domain(&arguments, &PinSet::new()).len(), 4);
//!
//! let pins: PinSet = [("n".to_owned(), "2".to_owned())].into_iter().collect();
//! assert_eq!(build_domain(&arguments, &pins).len(), 2);
//!
//! let pins: PinSet = [("n".to_owned(), "3".to_owned())].into_iter().collect();
//! assert!(build_domain(&arguments, &pins).is_empty());
//! # Ok::<(), serde_yaml::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::value::ArgValue;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// One declared parameter and its candidate values.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Label used by `arg` nodes and `--set`
    pub name: String,
    /// Candidate values in declaration order
    pub values: Vec<ArgValue>,
}

/// The parameters declared by a client, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Arguments {
    params: Vec<Parameter>,
}

impl Arguments {
    /// Iterate over the declared parameters.
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameter is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<Parameter> for Arguments {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<Value> for Arguments {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Err(Error::InvalidArguments {
                    name: "arguments".to_owned(),
                    reason: "expected a mapping from labels to value lists".to_owned(),
                });
            }
        };

        map.iter()
            .map(|(name, values)| {
                let name = ArgValue::from_yaml(name)
                    .ok_or_else(|| Error::InvalidArguments {
                        name: "arguments".to_owned(),
                        reason: "labels should be scalars".to_owned(),
                    })?
                    .to_string();

                let Value::Sequence(seq) = values else {
                    return Err(Error::InvalidArguments {
                        name,
                        reason: "expected a list of values".to_owned(),
                    });
                };

                let values = seq
                    .iter()
                    .map(|value| {
                        ArgValue::from_yaml(value).ok_or_else(|| Error::InvalidArguments {
                            name: name.clone(),
                            reason: "values should be strings, numbers or booleans".to_owned(),
                        })
                    })
                    .collect::<Result<_>>()?;

                Ok(Parameter { name, values })
            })
            .collect()
    }
}

/// Parameter values fixed from the command line.
///
/// Pins are plain strings; they are matched against the string form of the
/// declared values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinSet {
    pins: BTreeMap<String, String>,
}

impl PinSet {
    /// Create an empty pin set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `label` to `value`, replacing any earlier pin for `label`.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.pins.insert(label.into(), value.into());
    }

    /// The pinned value for `label`, if any.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.pins.get(label).map(String::as_str)
    }

    /// Whether nothing is pinned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

impl FromIterator<(String, String)> for PinSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pins: iter.into_iter().collect(),
        }
    }
}

/// One assignment of a value to every parameter of a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding<'a> {
    entries: Vec<(&'a str, &'a ArgValue)>,
}

impl<'a> Binding<'a> {
    /// The value bound to `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&'a ArgValue> {
        self.entries
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, value)| *value)
    }

    /// Bound labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// `(label, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a ArgValue)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of bound labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a ArgValue)> for Binding<'a> {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a ArgValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Lazy iterator over the bindings of a client.
///
/// Created by [`Domain::new`]; see [`build_domain`] for the eager form.
#[derive(Debug, Clone)]
pub struct Domain<'a> {
    factors: Vec<(&'a str, Vec<&'a ArgValue>)>,
    // Index into each factor; `None` once exhausted
    cursor: Option<Vec<usize>>,
}

impl<'a> Domain<'a> {
    /// Build the (pinned) product of `arguments`.
    #[must_use]
    pub fn new(arguments: &'a Arguments, pins: &PinSet) -> Self {
        let factors: Vec<_> = arguments
            .iter()
            .map(|param| (param.name.as_str(), effective_values(param, pins)))
            .collect();

        let cursor = if factors.iter().any(|(_, values)| values.is_empty()) {
            None
        } else {
            Some(vec![0; factors.len()])
        };

        Self { factors, cursor }
    }
}

impl<'a> Iterator for Domain<'a> {
    type Item = Binding<'a>;

    fn next(&mut self) -> Option<Binding<'a>> {
        let cursor = self.cursor.as_mut()?;

        let binding = self
            .factors
            .iter()
            .zip(cursor.iter())
            .map(|((name, values), &i)| (*name, values[i]))
            .collect();

        // Odometer step, last factor fastest
        let mut exhausted = true;
        for (pos, (_, values)) in self.factors.iter().enumerate().rev() {
            cursor[pos] += 1;
            if cursor[pos] < values.len() {
                exhausted = false;
                break;
            }
            cursor[pos] = 0;
        }
        if exhausted {
            self.cursor = None;
        }

        Some(binding)
    }
}

/// Values a parameter actually iterates over once `pins` are applied.
fn effective_values<'a>(param: &'a Parameter, pins: &PinSet) -> Vec<&'a ArgValue> {
    match pins.get(&param.name) {
        Some(pin) => param
            .values
            .iter()
            .find(|value| value.to_string() == pin)
            .into_iter()
            .collect(),
        None => param.values.iter().collect(),
    }
}

/// Enumerate every binding of `arguments` under `pins`.
///
/// The result is empty when any parameter ends up with no value. A client
/// without parameters has exactly one (empty) binding.
#[must_use]
pub fn build_domain<'a>(arguments: &'a Arguments, pins: &PinSet) -> Vec<Binding<'a>> {
    Domain::new(arguments, pins).collect()
}
