//! Positional placeholder expansion for `path_format` strings.
//!
//! Supported syntax:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `{0}`, `{1}`, ... | Parameter by position |
//! | `{}` | Next parameter (automatic numbering) |
//! | `{0:>4}`, `{0:_<8}`, `{0:^5}`, `{0:=5}` | Fill, alignment and width |
//! | `{0:03}` | Zero padded |
//! | `{{`, `}}` | Literal braces |
//!
//! Parameters keep their type: with a width, numbers align right and
//! `0` pads them after the sign (`-007`), while text aligns left and `0`
//! pads it on the right (`700`). Widths count characters, not bytes, so
//! accented names pad correctly.

use crate::error::{Error, Result};
use crate::value::ArgValue;
use std::fmt::Write as _;
use std::iter::Peekable;
use std::str::Chars;

/// Expand `template` with `params`.
///
/// # Errors
///
/// Returns [`Error::Template`] for unbalanced braces, indices past the end of
/// `params`, mixed manual/automatic numbering and unsupported specs.
pub(crate) fn expand(template: &str, params: &[ArgValue]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut numbering = Numbering::Unset;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let field = read_field(template, &mut chars)?;
                let (name, spec) = match field.split_once(':') {
                    Some((name, "")) => (name, None),
                    Some((name, spec)) => (name, Some(spec)),
                    None => (field.as_str(), None),
                };
                let index = numbering.next_index(template, name)?;
                let value = params.get(index).ok_or_else(|| {
                    Error::template(
                        template,
                        format!(
                            "placeholder {{{index}}} but only {} parameter(s) given",
                            params.len()
                        ),
                    )
                })?;
                match spec {
                    Some(spec) => {
                        FormatSpec::parse(template, spec)?.write(template, value, &mut out)?;
                    }
                    None => {
                        let _ = write!(out, "{value}");
                    }
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(Error::template(template, "single '}' encountered")),
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Read up to (and consume) the closing brace of a placeholder.
fn read_field(template: &str, chars: &mut Peekable<Chars<'_>>) -> Result<String> {
    let mut field = String::new();
    loop {
        match chars.next() {
            Some('}') => return Ok(field),
            Some('{') => return Err(Error::template(template, "unexpected '{' in field name")),
            Some(c) => field.push(c),
            None => return Err(Error::template(template, "single '{' encountered")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Unset,
    Auto(usize),
    Manual,
}

impl Numbering {
    fn next_index(&mut self, template: &str, name: &str) -> Result<usize> {
        if name.is_empty() {
            let index = match *self {
                Self::Unset => 0,
                Self::Auto(next) => next,
                Self::Manual => {
                    return Err(Error::template(
                        template,
                        "cannot switch from manual field numbering to automatic",
                    ));
                }
            };
            *self = Self::Auto(index + 1);
            return Ok(index);
        }

        if matches!(self, Self::Auto(_)) {
            return Err(Error::template(
                template,
                "cannot switch from automatic field numbering to manual",
            ));
        }
        *self = Self::Manual;
        name.trim()
            .parse()
            .map_err(|_| Error::template(template, format!("invalid placeholder {{{name}}}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign and the digits
    AfterSign,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Left),
            '>' => Some(Self::Right),
            '^' => Some(Self::Center),
            '=' => Some(Self::AfterSign),
            _ => None,
        }
    }
}

/// A parsed `[[fill]align][0][width]` spec. Unset parts depend on whether
/// the value is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FormatSpec {
    fill: Option<char>,
    align: Option<Align>,
    zero: bool,
    width: usize,
}

impl FormatSpec {
    fn parse(template: &str, spec: &str) -> Result<Self> {
        let chars: Vec<char> = spec.chars().collect();

        let second = chars.get(1).copied().and_then(Align::from_char);
        let (fill, align, rest) = match (chars.as_slice(), second) {
            ([fill, _, rest @ ..], Some(align)) => (Some(*fill), Some(align), rest),
            ([first, rest @ ..], None) => match Align::from_char(*first) {
                Some(align) => (None, Some(align), rest),
                None => (None, None, chars.as_slice()),
            },
            (all, _) => (None, None, all),
        };

        let (zero, digits) = match rest {
            ['0', digits @ ..] => (true, digits),
            digits => (false, digits),
        };

        let width = if digits.is_empty() {
            0
        } else {
            digits
                .iter()
                .collect::<String>()
                .parse()
                .map_err(|_| Error::template(template, format!("unsupported format spec {spec:?}")))?
        };

        Ok(Self {
            fill,
            align,
            zero,
            width,
        })
    }

    /// Pad `value` into `out`. Numbers (booleans included, as `1`/`0`)
    /// align right by default and the `0` flag pads them after the sign;
    /// text aligns left.
    fn write(&self, template: &str, value: &ArgValue, out: &mut String) -> Result<()> {
        let (text, numeric) = match value {
            ArgValue::Bool(b) => (u8::from(*b).to_string(), true),
            ArgValue::Number(n) => (n.to_string(), true),
            ArgValue::String(s) => (s.clone(), false),
        };

        let fill = self.fill.unwrap_or(if self.zero { '0' } else { ' ' });
        let align = match (self.align, numeric) {
            (Some(align), _) => align,
            (None, true) if self.zero => Align::AfterSign,
            (None, true) => Align::Right,
            (None, false) => Align::Left,
        };
        if align == Align::AfterSign && !numeric {
            return Err(Error::template(
                template,
                "'=' alignment not allowed for text values",
            ));
        }

        let pad = self.width.saturating_sub(text.chars().count());
        let (before, after) = match align {
            Align::Left => (0, pad),
            Align::Right | Align::AfterSign => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };

        let body = if align == Align::AfterSign {
            match text.strip_prefix(['-', '+']) {
                Some(digits) => {
                    out.push_str(&text[..text.len() - digits.len()]);
                    digits
                }
                None => text.as_str(),
            }
        } else {
            text.as_str()
        };

        out.extend(std::iter::repeat_n(fill, before));
        out.push_str(body);
        out.extend(std::iter::repeat_n(fill, after));
        Ok(())
    }
}
