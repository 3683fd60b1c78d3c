use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde_json::Value;

use crate::error::InvalidUnitError;

/// A size used in a breakpoint declaration.
///
/// Numbers are pixels. Strings are either plain digits (also pixels), a
/// length with a CSS unit, or any other CSS value such as `landscape`.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeValue {
    Number(f64),
    Text(String),
}

impl From<f64> for SizeValue {
    fn from(value: f64) -> Self {
        SizeValue::Number(value)
    }
}

impl From<f32> for SizeValue {
    fn from(value: f32) -> Self {
        SizeValue::Number(value as f64)
    }
}

impl From<i32> for SizeValue {
    fn from(value: i32) -> Self {
        SizeValue::Number(value as f64)
    }
}

impl From<u32> for SizeValue {
    fn from(value: u32) -> Self {
        SizeValue::Number(value as f64)
    }
}

impl From<&str> for SizeValue {
    fn from(value: &str) -> Self {
        SizeValue::Text(value.to_string())
    }
}

impl From<String> for SizeValue {
    fn from(value: String) -> Self {
        SizeValue::Text(value)
    }
}

impl TryFrom<&Value> for SizeValue {
    type Error = InvalidUnitError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(SizeValue::Number)
                .ok_or_else(|| InvalidUnitError::new(n)),
            Value::String(s) => Ok(SizeValue::Text(s.clone())),
            other => Err(InvalidUnitError::new(other)),
        }
    }
}

impl SizeValue {
    /// Whether this value can stand on its own as a width breakpoint: any
    /// number, or a string like `720px`, `45em` or `10rem`.
    pub fn is_width(&self) -> bool {
        match self {
            SizeValue::Number(_) => true,
            SizeValue::Text(s) => is_number_with_unit(s),
        }
    }

    /// Render the value as it appears inside a media feature.
    ///
    /// Finite numbers and plain-digit strings get a `px` suffix, other
    /// non-empty strings pass through untouched.
    pub fn render(&self) -> Result<String, InvalidUnitError> {
        match self {
            // `+ 0.0` turns `-0` into `0`.
            SizeValue::Number(n) if n.is_finite() => Ok(format!("{}px", n + 0.0)),
            SizeValue::Number(n) => Err(InvalidUnitError::new(n)),
            SizeValue::Text(s) if is_plain_number(s) => Ok(format!("{s}px")),
            SizeValue::Text(s) if !s.is_empty() => Ok(s.clone()),
            SizeValue::Text(s) => Err(InvalidUnitError::new(s)),
        }
    }
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeValue::Number(n) => write!(f, "{n}"),
            SizeValue::Text(s) => f.write_str(s),
        }
    }
}

/// Render an untyped configuration value, see [`SizeValue::render`].
///
/// Anything that is not a number or a string is rejected.
pub fn render_value(value: &Value) -> Result<String, InvalidUnitError> {
    SizeValue::try_from(value)?.render()
}

static NUMBER_WITH_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:r?em|px)$").expect("valid pattern"));
static PLAIN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").expect("valid pattern"));

/// Digits followed by `em`, `rem` or `px`.
pub(crate) fn is_number_with_unit(s: &str) -> bool {
    NUMBER_WITH_UNIT.is_match(s)
}

/// Digits with an optional fraction.
pub(crate) fn is_plain_number(s: &str) -> bool {
    PLAIN_NUMBER.is_match(s)
}
