//! Reading breakpoints from untyped JSON configuration.
//!
//! The accepted shapes mirror what a front-end configuration usually holds:
//!
//! ```json
//! {
//!     "mobile": [null, 767],
//!     "tablet": [768, 1023],
//!     "desktop": 1024,
//!     "wide": "90em",
//!     "landscape": { "orientation": "landscape" },
//!     "print": { "breakpoint": { "minResolution": "2dppx" }, "defaultValue": false }
//! }
//! ```
//!
//! The same map may also be nested under a single `"breakpoints"` key.
//! Object key order is kept.

use serde_json::{Map, Value};

use crate::{
    breakpoint::{Breakpoint, BreakpointEntry, Breakpoints, Rules},
    error::{Error, InvalidUnitError},
    unit::SizeValue,
};

impl Breakpoint {
    /// Read a declaration from an untyped value.
    ///
    /// Shapes that carry no rules (booleans, null, arrays that are not
    /// pairs) become [`Breakpoint::Empty`]. A feature map fails only when
    /// one of its values is neither a number nor a string.
    pub fn from_value(value: &Value) -> Result<Self, InvalidUnitError> {
        Ok(match value {
            Value::Number(_) | Value::String(_) => Breakpoint::Size(SizeValue::try_from(value)?),
            Value::Array(pair) if pair.len() == 2 => {
                Breakpoint::Range(pair_side(&pair[0]), pair_side(&pair[1]))
            }
            Value::Object(features) => {
                let mut rules = Rules::with_capacity(features.len());
                for (feature, value) in features {
                    rules.insert(feature.clone(), SizeValue::try_from(value)?);
                }
                Breakpoint::Features(rules)
            }
            Value::Array(_) | Value::Bool(_) | Value::Null => Breakpoint::Empty,
        })
    }
}

fn pair_side(value: &Value) -> Option<SizeValue> {
    SizeValue::try_from(value).ok()
}

impl BreakpointEntry {
    /// Read either a bare declaration or the extended
    /// `{ "breakpoint": ..., "defaultValue": ... }` form.
    pub fn from_value(value: &Value) -> Result<Self, InvalidUnitError> {
        if let Value::Object(object) = value
            && let Some(breakpoint) = object.get("breakpoint")
        {
            return Ok(BreakpointEntry {
                breakpoint: Breakpoint::from_value(breakpoint)?,
                default_value: object.get("defaultValue").map(truthy),
            });
        }
        Ok(Breakpoint::from_value(value)?.into())
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl Breakpoints {
    /// Read breakpoints from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let Value::Object(object) = value else {
            return Err(Error::InvalidConfig(format!(
                "expected an object of breakpoints, found {value}"
            )));
        };
        let object = unwrap_options(object);

        let mut breakpoints = Breakpoints::new();
        for (name, value) in object {
            let entry = BreakpointEntry::from_value(value).map_err(|source| Error::InvalidUnit {
                breakpoint: name.clone(),
                source,
            })?;
            breakpoints.insert(name.clone(), entry);
        }
        Ok(breakpoints)
    }

    /// Parse breakpoints from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }
}

fn unwrap_options(object: &Map<String, Value>) -> &Map<String, Value> {
    match object.get("breakpoints") {
        Some(Value::Object(inner)) if object.len() == 1 => inner,
        _ => object,
    }
}

#[cfg(feature = "serde")]
mod de {
    use serde::{Deserialize, Deserializer, de};
    use serde_json::Value;

    use crate::breakpoint::{Breakpoint, BreakpointEntry, Breakpoints};

    impl<'de> Deserialize<'de> for Breakpoint {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let value = Value::deserialize(deserializer)?;
            Breakpoint::from_value(&value).map_err(de::Error::custom)
        }
    }

    impl<'de> Deserialize<'de> for BreakpointEntry {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let value = Value::deserialize(deserializer)?;
            BreakpointEntry::from_value(&value).map_err(de::Error::custom)
        }
    }

    impl<'de> Deserialize<'de> for Breakpoints {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let value = Value::deserialize(deserializer)?;
            Breakpoints::from_value(&value).map_err(de::Error::custom)
        }
    }
}
